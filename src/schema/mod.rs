//! Record metadata: field descriptors and the compiled [`RecordSchema`].
//!
//! A record type describes its fields once through [`Record::fields`]; [`RecordSchema::compile`]
//! turns those descriptors into ordered rule chains, resolving column names and cross-field
//! references up front so the row pipeline never re-parses tags.

pub mod naming;
pub mod tags;

use crate::rules::{CrossFieldRule, Preprocessor, Validator};
use crate::types::{DataType, FromValue, Value};
use crate::{ProcessError, ProcessResult};

use naming::to_snake_case;
use tags::{TagError, TagMode, TagToken, tokenize};

/// Declarative description of one record field.
///
/// ```
/// use rust_fileprep::schema::FieldSpec;
/// use rust_fileprep::types::DataType;
///
/// let spec = FieldSpec::new("Email", DataType::Utf8)
///     .prep("trim,lowercase")
///     .validate("required,email");
/// assert_eq!(spec.ident(), "Email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    ident: String,
    data_type: DataType,
    column: Option<String>,
    prep: String,
    validate: String,
}

impl FieldSpec {
    pub fn new(ident: impl Into<String>, data_type: DataType) -> Self {
        Self {
            ident: ident.into(),
            data_type,
            column: None,
            prep: String::new(),
            validate: String::new(),
        }
    }

    /// Bind to this column name verbatim instead of the snake_case of the identifier.
    pub fn name(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Preprocessor tag string, e.g. `"trim,default=n/a"`.
    pub fn prep(mut self, tags: impl Into<String>) -> Self {
        self.prep = tags.into();
        self
    }

    /// Validator tag string, e.g. `"required,email,eqfield=Other"`.
    pub fn validate(mut self, tags: impl Into<String>) -> Self {
        self.validate = tags.into();
        self
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }
}

/// A compiled field: column binding plus its rule chains, in tag order.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field identifier as declared.
    pub ident: String,
    /// Column the field binds to.
    pub column: String,
    pub data_type: DataType,
    pub preprocessors: Vec<Preprocessor>,
    pub validators: Vec<Validator>,
    pub cross_field: Vec<CrossFieldRule>,
}

/// Immutable, compiled description of a record type.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<FieldRule>,
}

impl RecordSchema {
    /// Compile field descriptors.
    ///
    /// In [`TagMode::Strict`] the first unknown or malformed token fails with
    /// [`ProcessError::InvalidTagFormat`]; in [`TagMode::Lenient`] such tokens are dropped.
    /// A cross-field reference to an identifier that is not in `specs` is not a compile error;
    /// it fails on every row instead.
    pub fn compile(specs: Vec<FieldSpec>, mode: TagMode) -> ProcessResult<Self> {
        let mut fields = Vec::with_capacity(specs.len());

        for spec in specs {
            let mut preprocessors = Vec::new();
            for token in tokenize(&spec.prep) {
                let compiled = Preprocessor::from_token(&token);
                if let Some(p) = accept(&spec.ident, &token, mode, compiled)? {
                    preprocessors.push(p);
                }
            }

            let mut validators = Vec::new();
            let mut cross_field = Vec::new();
            for token in tokenize(&spec.validate) {
                match CrossFieldRule::from_token(&token) {
                    Ok(Some(rule)) => cross_field.push(rule),
                    Ok(None) => {
                        if let Some(v) =
                            accept(&spec.ident, &token, mode, Validator::from_token(&token))?
                        {
                            validators.push(v);
                        }
                    }
                    Err(err) => {
                        accept::<CrossFieldRule>(&spec.ident, &token, mode, Err(err))?;
                    }
                }
            }

            let column = spec
                .column
                .unwrap_or_else(|| to_snake_case(&spec.ident));
            fields.push(FieldRule {
                ident: spec.ident,
                column,
                data_type: spec.data_type,
                preprocessors,
                validators,
                cross_field,
            });
        }

        let mut schema = Self { fields };
        schema.resolve_cross_field_targets();
        Ok(schema)
    }

    fn resolve_cross_field_targets(&mut self) {
        let idents: Vec<String> = self.fields.iter().map(|f| f.ident.clone()).collect();
        for field in &mut self.fields {
            for rule in &mut field.cross_field {
                rule.target_index = idents.iter().position(|ident| *ident == rule.target);
            }
        }
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Look up a field by identifier.
    pub fn field(&self, ident: &str) -> Option<&FieldRule> {
        self.index_of(ident).map(|i| &self.fields[i])
    }

    /// Schema position of a field identifier.
    pub fn index_of(&self, ident: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.ident == ident)
    }

    /// Bound column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Strict mode turns a token error into [`ProcessError::InvalidTagFormat`]; lenient mode drops it.
fn accept<T>(
    field: &str,
    token: &TagToken<'_>,
    mode: TagMode,
    parsed: Result<T, TagError>,
) -> ProcessResult<Option<T>> {
    match (parsed, mode) {
        (Ok(rule), _) => Ok(Some(rule)),
        (Err(_), TagMode::Lenient) => Ok(None),
        (Err(err), TagMode::Strict) => Err(ProcessError::InvalidTagFormat {
            field: field.to_string(),
            token: token.raw.to_string(),
            message: err.message(token.name),
        }),
    }
}

/// A Rust type the pipeline can materialize from processed rows.
///
/// ```
/// use rust_fileprep::schema::{FieldSpec, Record, RowValues};
/// use rust_fileprep::types::DataType;
///
/// struct User {
///     name: String,
///     age: u8,
/// }
///
/// impl Record for User {
///     fn fields() -> Vec<FieldSpec> {
///         vec![
///             FieldSpec::new("Name", DataType::Utf8).prep("trim").validate("required"),
///             FieldSpec::new("Age", DataType::UInt8).validate("lte=130"),
///         ]
///     }
///
///     fn from_row(row: &RowValues<'_>) -> Self {
///         Self { name: row.get("Name"), age: row.get("Age") }
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    /// Field descriptors in declaration order.
    fn fields() -> Vec<FieldSpec>;

    /// Build a record from one row of coerced values.
    fn from_row(row: &RowValues<'_>) -> Self;
}

/// Coerced values of one row, addressed by field identifier.
#[derive(Debug, Clone, Copy)]
pub struct RowValues<'a> {
    schema: &'a RecordSchema,
    values: &'a [Value],
}

impl<'a> RowValues<'a> {
    /// `values` must be in schema field order.
    pub fn new(schema: &'a RecordSchema, values: &'a [Value]) -> Self {
        Self { schema, values }
    }

    /// Typed value of a field; the type's default when the field is unknown.
    pub fn get<T: FromValue>(&self, ident: &str) -> T {
        self.value(ident)
            .map(T::from_value)
            .unwrap_or_else(|| T::from_value(&Value::Null))
    }

    pub fn value(&self, ident: &str) -> Option<&'a Value> {
        self.schema.index_of(ident).and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}
