//! `rust-fileprep` reads tabular files into typed records, cleaning and validating every cell on
//! the way, and writes the cleaned rows back out.
//!
//! A record type declares its fields once (see [`schema::Record`]); each field carries a column
//! binding, a `prep` tag string (preprocessors) and a `validate` tag string (validators and
//! cross-field validators). [`processing::Processor`] then runs every row through
//! preprocess → coerce → validate → cross-field validate, collects per-cell errors without
//! stopping, and emits the processed rows as a readable [`emit::Stream`].
//!
//! ## Formats
//!
//! **Inputs (detected from the stacked extension by [`processing::Processor::process_path`]):**
//!
//! - **CSV** `.csv`, **TSV** `.tsv`, **LTSV** `.ltsv`
//! - **JSON** `.json` (top-level array), **JSONL** `.jsonl` / `.ndjson`
//! - **Parquet** `.parquet`
//! - **XLSX** `.xlsx` (requires the Cargo feature `excel`, on by default)
//!
//! **Compression:** `.gz`, `.bz2`, `.xz`, `.zst`, `.z` (zlib), `.snappy`, `.s2`, `.lz4`, e.g.
//! `users.csv.gz`.
//!
//! **Outputs:** CSV, TSV and LTSV round-trip; JSON and JSONL become compact JSONL; Parquet and
//! XLSX become CSV. Output is never compressed.
//!
//! ## Quick example
//!
//! ```rust
//! use rust_fileprep::processing::Processor;
//! use rust_fileprep::schema::{FieldSpec, Record, RowValues};
//! use rust_fileprep::types::{DataType, FileFormat, FileType};
//!
//! struct Account {
//!     password: String,
//! }
//!
//! impl Record for Account {
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::new("Password", DataType::Utf8).validate("required,min=6"),
//!             FieldSpec::new("ConfirmPassword", DataType::Utf8).validate("eqfield=Password"),
//!         ]
//!     }
//!
//!     fn from_row(row: &RowValues<'_>) -> Self {
//!         Self { password: row.get("Password") }
//!     }
//! }
//!
//! # fn main() -> Result<(), rust_fileprep::ProcessError> {
//! let input = "password,confirm_password\ns3cret,s3cret\ns3cret,different\n";
//! let out = Processor::default()
//!     .process::<Account, _>(input.as_bytes(), FileFormat::plain(FileType::Csv))?;
//!
//! assert_eq!(out.result.valid_row_count, 1);
//! let err = &out.result.errors[0];
//! assert_eq!((err.row(), err.tag()), (2, "eqfield"));
//! assert_eq!(out.records[0].password, "s3cret");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: the [`processing::Processor`] entry point, row pipeline, results, observers
//! - [`schema`]: field descriptors, tag parsing, compiled [`schema::RecordSchema`]
//! - [`rules`]: preprocessors, validators, cross-field validators
//! - [`ingestion`]: format parsers producing a [`types::ParsedTable`]
//! - [`compression`]: decompression adapters
//! - [`emit`]: output serializers and [`emit::Stream`]
//! - [`types`]: formats, data types, values
//! - [`error`]: the fatal error type

pub mod compression;
pub mod emit;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod rules;
pub mod schema;
pub mod types;

pub use error::{ProcessError, ProcessResult};
