use thiserror::Error;

use crate::types::Compression;

/// Convenience result type for processing operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Fatal error returned by schema compilation and by a processing call.
///
/// Per-cell problems (type conversion, failed validators) are never returned here; they are
/// collected into [`crate::processing::ProcessingResult::errors`] instead.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The compressed input could not be decoded.
    #[error("{codec} decompression failed: {source}")]
    Compression {
        codec: Compression,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "excel")]
    /// Excel parsing error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV/TSV parsing or writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet parsing error (including truncated files).
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON serialization error while emitting JSONL.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input was empty, or decoded to no rows and no headers.
    #[error("input is empty")]
    EmptyInput,

    /// A `prep`/`validate` tag token is unknown or carries a malformed argument (strict mode).
    #[error("invalid tag format on field '{field}': token '{token}': {message}")]
    InvalidTagFormat {
        field: String,
        token: String,
        message: String,
    },

    /// The table structure is broken beyond recovery (e.g. a CSV row wider than its header).
    #[error("malformed table: {message}")]
    MalformedTable { message: String },

    /// The format could not be determined or is not enabled in this build.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// Preprocessing turned a JSON row into text that no longer parses as JSON.
    #[error("row {row}: value is not valid JSON after preprocessing: '{value}'")]
    JsonInvalidAfterPrep { row: usize, value: String },

    /// Every JSON row was emptied by preprocessing; nothing is left to emit.
    #[error("all JSON rows are empty after preprocessing")]
    JsonAllRowsEmpty,
}

impl ProcessError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedTable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_invalid_message_names_row_and_value() {
        let err = ProcessError::JsonInvalidAfterPrep {
            row: 1,
            value: "{\"key".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 1"));
        assert!(msg.contains("{\"key"));
    }

    #[test]
    fn tag_format_message_names_field_and_token() {
        let err = ProcessError::InvalidTagFormat {
            field: "Age".to_string(),
            token: "gt=abc".to_string(),
            message: "expected a number".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Age'"));
        assert!(msg.contains("'gt=abc'"));
    }

    #[test]
    fn compression_error_names_codec() {
        let err = ProcessError::Compression {
            codec: Compression::Gzip,
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header"),
        };
        assert!(err.to_string().starts_with("gzip decompression failed"));
    }
}
