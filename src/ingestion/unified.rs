//! Unified parsing entrypoint.
//!
//! Most callers should go through [`crate::processing::Processor`]; this module is the layer
//! beneath it that turns raw (possibly compressed) bytes into a [`ParsedTable`].
//!
//! - [`read_table`] decompresses according to [`FileFormat::compression`] and then parses.
//! - [`parse_table`] parses already-decompressed bytes of a given [`FileType`].
//! - [`infer_format_from_path`] detects the format from a stacked extension (`data.csv.gz`).

use std::io::Read;
use std::path::Path;

use crate::compression;
use crate::error::{ProcessError, ProcessResult};
use crate::types::{FileFormat, FileType, ParsedTable};

use super::{csv, json, ltsv, parquet};

/// Parse decompressed bytes of the given format into a [`ParsedTable`].
///
/// # Examples
///
/// ```rust
/// use rust_fileprep::ingestion::parse_table;
/// use rust_fileprep::types::FileType;
///
/// # fn main() -> Result<(), rust_fileprep::ProcessError> {
/// let table = parse_table(b"host:a\tstatus:200\nstatus:404\n", FileType::Ltsv)?;
/// assert_eq!(table.headers, vec!["host", "status"]);
/// assert_eq!(table.rows[1], vec!["", "404"]);
/// # Ok(())
/// # }
/// ```
pub fn parse_table(input: &[u8], file_type: FileType) -> ProcessResult<ParsedTable> {
    if input.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    match file_type {
        FileType::Csv => csv::parse_csv(input),
        FileType::Tsv => csv::parse_tsv(input),
        FileType::Ltsv => ltsv::parse_ltsv(input),
        FileType::Json => json::parse_json(input),
        FileType::Jsonl => json::parse_jsonl(input),
        FileType::Parquet => parquet::parse_parquet(input),
        FileType::Xlsx => parse_xlsx_dispatch(input),
    }
}

/// Read a whole source, decompress it, and parse it.
pub fn read_table<R: Read>(reader: R, format: FileFormat) -> ProcessResult<ParsedTable> {
    let bytes = compression::read_all(reader, format.compression)?;
    parse_table(&bytes, format.file_type)
}

/// Detect the format of `path` from its (possibly stacked) extension.
pub fn infer_format_from_path(path: &Path) -> ProcessResult<FileFormat> {
    FileFormat::from_path(path).ok_or_else(|| ProcessError::UnsupportedFormat {
        message: format!("cannot infer format from path ({})", path.display()),
    })
}

fn parse_xlsx_dispatch(input: &[u8]) -> ProcessResult<ParsedTable> {
    #[cfg(feature = "excel")]
    {
        super::excel::parse_xlsx(input)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = input;
        Err(ProcessError::UnsupportedFormat {
            message: "xlsx parsing not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
