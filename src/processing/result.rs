//! Per-call outcome: row counts and the ordered list of per-cell errors.

use serde::Serialize;
use thiserror::Error;

use crate::types::FileFormat;

/// Tag of the [`PrepError`] raised when a value cannot be coerced to its field type.
pub const TYPE_CONVERSION: &str = "type_conversion";
/// Tag of the [`PrepError`] raised when a JSON row's data is empty after preprocessing.
pub const EMPTY_JSON_DATA: &str = "empty_json_data";

/// A value could not be prepared: coercion failed, or a JSON row became empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("row {row}: column '{column}' (field {field}): {tag}: {message}")]
pub struct PrepError {
    /// 1-based data row.
    pub row: usize,
    pub column: String,
    pub field: String,
    pub tag: String,
    pub message: String,
    /// The preprocessed value that failed.
    pub value: String,
}

/// A validator or cross-field validator rejected a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("row {row}: column '{column}' (field {field}): {tag}: {message}")]
pub struct ValidationError {
    /// 1-based data row.
    pub row: usize,
    pub column: String,
    pub field: String,
    pub tag: String,
    pub message: String,
    /// The coerced-then-restringified value that was validated.
    pub value: String,
    /// Referenced field, for cross-field validators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowError {
    #[error(transparent)]
    Prep(PrepError),
    #[error(transparent)]
    Validation(ValidationError),
}

impl RowError {
    pub fn row(&self) -> usize {
        match self {
            Self::Prep(e) => e.row,
            Self::Validation(e) => e.row,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::Prep(e) => &e.field,
            Self::Validation(e) => &e.field,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Prep(e) => &e.column,
            Self::Validation(e) => &e.column,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Prep(e) => &e.tag,
            Self::Validation(e) => &e.tag,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Prep(e) => &e.message,
            Self::Validation(e) => &e.message,
        }
    }
}

/// Summary of one processing call.
///
/// `row_count` and `valid_row_count` always describe the whole input, even when the
/// emitted stream and the returned records were filtered to valid rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    pub row_count: usize,
    pub valid_row_count: usize,
    /// Errors in row order, then field order within a row.
    pub errors: Vec<RowError>,
    /// Headers of the parsed input.
    pub headers: Vec<String>,
    pub output_format: FileFormat,
    pub original_format: FileFormat,
}

impl ProcessingResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn invalid_row_count(&self) -> usize {
        self.row_count - self.valid_row_count
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn prep_errors(&self) -> impl Iterator<Item = &PrepError> {
        self.errors.iter().filter_map(|e| match e {
            RowError::Prep(p) => Some(p),
            RowError::Validation(_) => None,
        })
    }

    pub fn validation_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter_map(|e| match e {
            RowError::Validation(v) => Some(v),
            RowError::Prep(_) => None,
        })
    }

    /// Errors of one 1-based row.
    pub fn errors_for_row(&self, row: usize) -> impl Iterator<Item = &RowError> {
        self.errors.iter().filter(move |e| e.row() == row)
    }

    /// Share of valid rows; `1.0` for an input without rows.
    pub fn valid_ratio(&self) -> f64 {
        if self.row_count == 0 {
            1.0
        } else {
            self.valid_row_count as f64 / self.row_count as f64
        }
    }
}
