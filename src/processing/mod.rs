//! Record processing: bind columns, run every row through its field rules, aggregate errors,
//! and emit the processed rows.
//!
//! [`Processor`] is the entry point. It owns the options and a cache of compiled schemas, so one
//! processor can be shared (it is `Send + Sync`) and reused across calls.
//!
//! ## Example
//!
//! ```rust
//! use std::io::Read;
//!
//! use rust_fileprep::processing::{ProcessOptions, Processor};
//! use rust_fileprep::schema::{FieldSpec, Record, RowValues};
//! use rust_fileprep::types::{DataType, FileFormat, FileType};
//!
//! struct Signup {
//!     email: String,
//!     age: u8,
//! }
//!
//! impl Record for Signup {
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::new("Email", DataType::Utf8)
//!                 .prep("trim,lowercase")
//!                 .validate("required,email"),
//!             FieldSpec::new("Age", DataType::UInt8).validate("gte=18"),
//!         ]
//!     }
//!
//!     fn from_row(row: &RowValues<'_>) -> Self {
//!         Self { email: row.get("Email"), age: row.get("Age") }
//!     }
//! }
//!
//! # fn main() -> Result<(), rust_fileprep::ProcessError> {
//! let input = "email,age\n  ADA@Example.com ,36\nnope,12\n";
//! let processor = Processor::new(ProcessOptions::default());
//! let format = FileFormat::plain(FileType::Csv);
//! let mut out = processor.process::<Signup, _>(input.as_bytes(), format)?;
//!
//! assert_eq!(out.result.row_count, 2);
//! assert_eq!(out.result.valid_row_count, 1);
//! assert_eq!(out.records[0].email, "ada@example.com");
//! assert_eq!(out.records[0].age, 36);
//!
//! let mut csv = String::new();
//! out.stream.read_to_string(&mut csv)?;
//! assert_eq!(csv, "email,age\nada@example.com,36\nnope,12\n");
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod coerce;
pub mod observability;
pub mod pipeline;
pub mod result;

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::IgnoredAny;

use crate::emit::{Stream, emit};
use crate::error::{ProcessError, ProcessResult};
use crate::ingestion::{JSON_COLUMN, infer_format_from_path, read_table};
use crate::schema::tags::TagMode;
use crate::schema::{Record, RecordSchema, RowValues};
use crate::types::{FileFormat, ParsedTable, Value};

pub use binder::ColumnIndex;
pub use observability::{
    CompositeObserver, FileObserver, ProcessContext, ProcessObserver, ProcessSeverity,
    ProcessStats, StdErrObserver,
};
pub use pipeline::{RowOutcome, process_row};
pub use result::{
    EMPTY_JSON_DATA, PrepError, ProcessingResult, RowError, TYPE_CONVERSION, ValidationError,
};

use observability::severity_for_error;

/// Longest prefix of an invalid JSON value quoted in [`ProcessError::JsonInvalidAfterPrep`].
const JSON_ERROR_VALUE_CHARS: usize = 100;

/// Options controlling processing behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ProcessOptions {
    /// How unknown or malformed tag tokens are handled during schema compilation.
    pub tag_mode: TagMode,
    /// Keep only error-free rows in the returned records and the emitted stream.
    pub valid_rows_only: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ProcessObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ProcessSeverity,
}

impl fmt::Debug for ProcessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessOptions")
            .field("tag_mode", &self.tag_mode)
            .field("valid_rows_only", &self.valid_rows_only)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            tag_mode: TagMode::Strict,
            valid_rows_only: false,
            observer: None,
            alert_at_or_above: ProcessSeverity::Critical,
        }
    }
}

/// Output of one processing call.
pub struct Processed<T> {
    /// Emitted rows, readable from the start.
    pub stream: Stream,
    pub result: ProcessingResult,
    /// One record per row (per valid row with `valid_rows_only`), in input order.
    pub records: Vec<T>,
}

// Record types need not be `Debug`.
impl<T> fmt::Debug for Processed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processed")
            .field("stream", &self.stream)
            .field("result", &self.result)
            .field("records", &self.records.len())
            .finish()
    }
}

/// Processes tabular input against record schemas.
pub struct Processor {
    options: ProcessOptions,
    schemas: RwLock<HashMap<TypeId, Arc<RecordSchema>>>,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(ProcessOptions::default())
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Processor")
            .field("options", &self.options)
            .field("cached_schemas", &cached)
            .finish()
    }
}

impl Processor {
    pub fn new(options: ProcessOptions) -> Self {
        Self {
            options,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// The compiled schema of `T`, compiling it on first use.
    pub fn compile<T: Record>(&self) -> ProcessResult<Arc<RecordSchema>> {
        let key = TypeId::of::<T>();
        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(RecordSchema::compile(T::fields(), self.options.tag_mode)?);
        let mut cache = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(schema)))
    }

    /// Process a whole input of the given format into records of type `T`.
    ///
    /// When an observer is configured, this reports:
    ///
    /// - `on_success` when the call completes, then `on_row_errors` if any row was invalid
    /// - `on_failure` on failure, with a computed severity
    /// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
    pub fn process<T: Record, R: Read>(
        &self,
        reader: R,
        format: FileFormat,
    ) -> ProcessResult<Processed<T>> {
        let ctx = ProcessContext { path: None, format };
        let result = self
            .compile::<T>()
            .and_then(|schema| self.run(&schema, reader, format, T::from_row));
        self.report(&ctx, result)
    }

    /// Open `path`, detect its format from the (possibly stacked) extension, and process it.
    pub fn process_path<T: Record>(&self, path: impl AsRef<Path>) -> ProcessResult<Processed<T>> {
        let path = path.as_ref();
        let format = infer_format_from_path(path)?;
        let ctx = ProcessContext {
            path: Some(path.to_path_buf()),
            format,
        };

        let result = self.compile::<T>().and_then(|schema| {
            let file = File::open(path)?;
            self.run(&schema, BufReader::new(file), format, T::from_row)
        });
        self.report(&ctx, result)
    }

    /// Process against an explicitly compiled schema; records are the coerced values of each
    /// row in schema field order.
    pub fn process_with_schema<R: Read>(
        &self,
        schema: &RecordSchema,
        reader: R,
        format: FileFormat,
    ) -> ProcessResult<Processed<Vec<Value>>> {
        let ctx = ProcessContext { path: None, format };
        let result = self.run(schema, reader, format, |row: &RowValues<'_>| row.values().to_vec());
        self.report(&ctx, result)
    }

    fn run<T, R: Read>(
        &self,
        schema: &RecordSchema,
        reader: R,
        format: FileFormat,
        build: impl Fn(&RowValues<'_>) -> T,
    ) -> ProcessResult<Processed<T>> {
        let table = read_table(reader, format)?;
        let index = ColumnIndex::bind(schema, &table.headers);
        let is_json = format.file_type.is_json();
        let json_field = (0..schema.len())
            .find(|&i| schema.fields()[i].column == JSON_COLUMN && index.position(i).is_some());

        let mut errors = Vec::new();
        let mut records = Vec::new();
        let mut out_rows = Vec::with_capacity(table.rows.len());
        let mut valid_row_count = 0;

        for (i, row) in table.rows.iter().enumerate() {
            let row_number = i + 1;
            let mut outcome = process_row(schema, &index, row, row_number);
            let out_row = output_row(schema, &index, row, &outcome);

            let mut emit_row = true;
            if is_json {
                let data = match json_field {
                    Some(f) => outcome.preprocessed[f].clone(),
                    None => row.first().cloned().unwrap_or_default(),
                };
                if data.trim().is_empty() {
                    outcome.errors.push(RowError::Prep(PrepError {
                        row: row_number,
                        column: JSON_COLUMN.to_string(),
                        field: json_field
                            .map_or(JSON_COLUMN, |f| schema.fields()[f].ident.as_str())
                            .to_string(),
                        tag: EMPTY_JSON_DATA.to_string(),
                        message: "JSON data is empty after preprocessing".to_string(),
                        value: data,
                    }));
                    emit_row = false;
                } else if serde_json::from_str::<IgnoredAny>(&data).is_err() {
                    return Err(ProcessError::JsonInvalidAfterPrep {
                        row: row_number,
                        value: data.chars().take(JSON_ERROR_VALUE_CHARS).collect(),
                    });
                }
            }

            let valid = outcome.is_valid();
            if valid {
                valid_row_count += 1;
            }
            if valid || !self.options.valid_rows_only {
                records.push(build(&RowValues::new(schema, &outcome.values)));
                if emit_row {
                    out_rows.push(out_row);
                }
            }
            errors.append(&mut outcome.errors);
        }

        // Counted after the valid-only filter: an empty JSONL stream is never returned.
        if is_json && out_rows.is_empty() {
            return Err(ProcessError::JsonAllRowsEmpty);
        }

        let output_format = FileFormat::plain(format.file_type.output_type());
        let emitted = ParsedTable::new(table.headers, out_rows);
        let bytes = emit(&emitted, format.file_type)?;

        Ok(Processed {
            stream: Stream::new(bytes, output_format, format),
            result: ProcessingResult {
                row_count: table.rows.len(),
                valid_row_count,
                errors,
                headers: emitted.headers,
                output_format,
                original_format: format,
            },
            records,
        })
    }

    fn report<T>(
        &self,
        ctx: &ProcessContext,
        result: ProcessResult<Processed<T>>,
    ) -> ProcessResult<Processed<T>> {
        if let Some(obs) = self.options.observer.as_ref() {
            match &result {
                Ok(p) => {
                    let stats = ProcessStats {
                        rows: p.result.row_count,
                        valid_rows: p.result.valid_row_count,
                        errors: p.result.error_count(),
                    };
                    obs.on_success(ctx, stats);
                    if p.result.has_errors() {
                        obs.on_row_errors(ctx, stats);
                    }
                }
                Err(e) => {
                    let sev = severity_for_error(e);
                    obs.on_failure(ctx, sev, e);
                    if sev >= self.options.alert_at_or_above {
                        obs.on_alert(ctx, sev, e);
                    }
                }
            }
        }
        result
    }
}

/// The source row with each bound column replaced by its field's preprocessed text.
///
/// When several fields bind the same column, the first one wins; unbound columns and later
/// duplicate headers pass through unchanged.
fn output_row(
    schema: &RecordSchema,
    index: &ColumnIndex,
    row: &[String],
    outcome: &RowOutcome,
) -> Vec<String> {
    let mut out = row.to_vec();
    let mut written = vec![false; out.len()];
    for i in 0..schema.len() {
        if let Some(p) = index.position(i) {
            if p < out.len() && !written[p] {
                out[p] = outcome.preprocessed[i].clone();
                written[p] = true;
            }
        }
    }
    out
}
