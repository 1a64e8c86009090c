//! Output side: serialize processed rows back into a format and hand them out as a [`Stream`].
//!
//! | input            | output |
//! |------------------|--------|
//! | CSV              | CSV    |
//! | TSV              | TSV    |
//! | LTSV             | LTSV   |
//! | JSON, JSONL      | JSONL  |
//! | Parquet, XLSX    | CSV    |
//!
//! Output is never compressed.

pub mod delimited;
pub mod jsonl;
pub mod ltsv;

use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};

use crate::error::ProcessResult;
use crate::types::{FileFormat, FileType, ParsedTable};

pub use delimited::write_delimited;
pub use jsonl::write_jsonl;
pub use ltsv::write_ltsv;

/// Serialize `table` in the output format of `input_type`.
///
/// For JSON inputs the first cell of each row must hold a JSON text; empty cells are skipped.
///
/// ```rust
/// use rust_fileprep::emit::emit;
/// use rust_fileprep::types::{FileType, ParsedTable};
///
/// # fn main() -> Result<(), rust_fileprep::ProcessError> {
/// let table = ParsedTable::new(
///     vec!["id".into(), "name".into()],
///     vec![vec!["1".into(), "Ada".into()]],
/// );
/// let bytes = emit(&table, FileType::Parquet)?;
/// assert_eq!(bytes, b"id,name\n1,Ada\n");
/// # Ok(())
/// # }
/// ```
pub fn emit(table: &ParsedTable, input_type: FileType) -> ProcessResult<Vec<u8>> {
    match input_type.output_type() {
        FileType::Tsv => write_delimited(&table.headers, &table.rows, b'\t'),
        FileType::Ltsv => write_ltsv(&table.headers, &table.rows),
        FileType::Jsonl | FileType::Json => write_jsonl(
            table
                .rows
                .iter()
                .map(|row| row.first().map_or("", String::as_str)),
        ),
        FileType::Csv | FileType::Parquet | FileType::Xlsx => {
            write_delimited(&table.headers, &table.rows, b',')
        }
    }
}

/// In-memory, seekable handle over emitted bytes.
#[derive(Debug, Clone)]
pub struct Stream {
    inner: Cursor<Vec<u8>>,
    output_format: FileFormat,
    original_format: FileFormat,
}

impl Stream {
    pub fn new(bytes: Vec<u8>, output_format: FileFormat, original_format: FileFormat) -> Self {
        Self {
            inner: Cursor::new(bytes),
            output_format,
            original_format,
        }
    }

    /// Format of the emitted bytes (always uncompressed).
    pub fn output_format(&self) -> FileFormat {
        self.output_format
    }

    /// Format of the input, including its compression.
    pub fn original_format(&self) -> FileFormat {
        self.original_format
    }

    /// All emitted bytes, regardless of the read position.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }

    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for Stream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
