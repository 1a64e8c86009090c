//! The per-row pipeline: preprocess, coerce, validate, then cross-field validate.

use crate::rules::apply_chain;
use crate::schema::RecordSchema;
use crate::types::Value;

use super::binder::ColumnIndex;
use super::coerce::{coerce, restringify};
use super::result::{PrepError, RowError, TYPE_CONVERSION, ValidationError};

/// Everything the pipeline produced for one row, in schema field order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    /// Coerced values; a field whose coercion failed holds its zero value.
    pub values: Vec<Value>,
    /// Preprocessed text, written back into the emitted row.
    pub preprocessed: Vec<String>,
    /// Text seen by validators: restringified value, or the preprocessed text on failure.
    pub effective: Vec<String>,
    pub errors: Vec<RowError>,
}

impl RowOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run every field of `row` through its rules. `row_number` is 1-based.
pub fn process_row(
    schema: &RecordSchema,
    index: &ColumnIndex,
    row: &[String],
    row_number: usize,
) -> RowOutcome {
    let fields = schema.fields();
    let mut out = RowOutcome {
        values: Vec::with_capacity(fields.len()),
        preprocessed: Vec::with_capacity(fields.len()),
        effective: Vec::with_capacity(fields.len()),
        errors: Vec::new(),
    };

    for (i, field) in fields.iter().enumerate() {
        let prepped = apply_chain(&field.preprocessors, index.cell(row, i));

        let (value, effective) = match coerce(&prepped, &field.data_type) {
            Ok(value) => {
                let text = restringify(&prepped, &value);
                (value, text)
            }
            Err(message) => {
                out.errors.push(RowError::Prep(PrepError {
                    row: row_number,
                    column: field.column.clone(),
                    field: field.ident.clone(),
                    tag: TYPE_CONVERSION.to_string(),
                    message,
                    value: prepped.clone(),
                }));
                (field.data_type.zero(), prepped.clone())
            }
        };

        for validator in &field.validators {
            if let Err(message) = validator.check(&effective, &field.data_type) {
                out.errors.push(RowError::Validation(ValidationError {
                    row: row_number,
                    column: field.column.clone(),
                    field: field.ident.clone(),
                    tag: validator.name().to_string(),
                    message,
                    value: effective.clone(),
                    target: None,
                }));
            }
        }

        out.values.push(value);
        out.preprocessed.push(prepped);
        out.effective.push(effective);
    }

    for (i, field) in fields.iter().enumerate() {
        let own = &out.effective[i];
        for rule in &field.cross_field {
            let other = rule
                .target_index
                .and_then(|t| out.effective.get(t))
                .map(String::as_str);
            if let Err(message) = rule.check(own, other) {
                out.errors.push(RowError::Validation(ValidationError {
                    row: row_number,
                    column: field.column.clone(),
                    field: field.ident.clone(),
                    tag: rule.name().to_string(),
                    message,
                    value: own.clone(),
                    target: Some(rule.target.clone()),
                }));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use crate::schema::tags::TagMode;
    use crate::types::DataType;

    fn run(specs: Vec<FieldSpec>, headers: &[&str], row: &[&str]) -> RowOutcome {
        let schema = RecordSchema::compile(specs, TagMode::Strict).unwrap();
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let row: Vec<String> = row.iter().map(|s| s.to_string()).collect();
        let index = ColumnIndex::bind(&schema, &headers);
        process_row(&schema, &index, &row, 1)
    }

    #[test]
    fn preprocess_then_validate() {
        let out = run(
            vec![FieldSpec::new("Email", DataType::Utf8)
                .prep("trim,lowercase")
                .validate("required,email")],
            &["email"],
            &["  ADA@Example.COM "],
        );
        assert!(out.is_valid());
        assert_eq!(out.values[0], Value::Utf8("ada@example.com".into()));
        assert_eq!(out.preprocessed[0], "ada@example.com");
    }

    #[test]
    fn conversion_failure_keeps_zero_and_continues() {
        let out = run(
            vec![
                FieldSpec::new("Age", DataType::Int64).validate("numeric"),
                FieldSpec::new("Name", DataType::Utf8).validate("required"),
            ],
            &["age", "name"],
            &["not-a-number", ""],
        );
        assert_eq!(out.values[0], Value::Int64(0));
        assert_eq!(out.errors.len(), 3);
        assert_eq!(out.errors[0].tag(), TYPE_CONVERSION);
        assert_eq!(out.errors[1].tag(), "numeric");
        assert_eq!(out.errors[2].tag(), "required");
        assert_eq!(out.effective[0], "not-a-number");
    }

    #[test]
    fn validators_do_not_short_circuit() {
        let out = run(
            vec![FieldSpec::new("Code", DataType::Utf8).validate("len=3,uppercase,alpha")],
            &["code"],
            &["ab1z"],
        );
        let tags: Vec<&str> = out.errors.iter().map(RowError::tag).collect();
        assert_eq!(tags, vec!["len", "uppercase", "alpha"]);
    }

    #[test]
    fn cross_field_runs_after_all_fields() {
        let specs = || {
            vec![
                FieldSpec::new("ConfirmPassword", DataType::Utf8).validate("eqfield=Password"),
                FieldSpec::new("Password", DataType::Utf8)
                    .prep("trim")
                    .validate("required"),
            ]
        };
        let ok = run(specs(), &["confirm_password", "password"], &["s3cret", " s3cret "]);
        assert!(ok.is_valid());

        let bad = run(specs(), &["confirm_password", "password"], &["different", ""]);
        assert_eq!(bad.errors.len(), 2);
        assert_eq!(bad.errors[0].tag(), "required");
        match &bad.errors[1] {
            RowError::Validation(v) => {
                assert_eq!(v.tag, "eqfield");
                assert_eq!(v.target.as_deref(), Some("Password"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn cross_field_sees_restringified_values() {
        let out = run(
            vec![
                FieldSpec::new("Min", DataType::Float64),
                FieldSpec::new("Max", DataType::Float64).validate("gtfield=Min"),
            ],
            &["min", "max"],
            &["10.0", "9.50"],
        );
        assert_eq!(out.effective, vec!["10", "9.5"]);
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn unknown_target_reports_field_not_found() {
        let out = run(
            vec![FieldSpec::new("A", DataType::Utf8).validate("nefield=Ghost")],
            &["a"],
            &["x"],
        );
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].message().contains("field not found"));
    }

    #[test]
    fn unresolved_column_reads_empty() {
        let out = run(
            vec![FieldSpec::new("Age", DataType::UInt8).validate("required")],
            &["name"],
            &["Bob"],
        );
        assert_eq!(out.values[0], Value::UInt64(0));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].tag(), "required");
    }
}
