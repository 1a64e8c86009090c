//! Format parsers.
//!
//! Every parser produces the same [`crate::types::ParsedTable`] contract: ordered headers plus
//! rows of string cells, each row exactly as wide as the header.
//!
//! Most callers should use [`read_table`] / [`parse_table`] (from [`unified`]). Format-specific
//! functions are also available under:
//! - [`csv`] (CSV and TSV)
//! - [`ltsv`]
//! - [`json`] (JSON array and JSONL)
//! - [`parquet`]
//! - `excel` (XLSX, feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod ltsv;
pub mod parquet;
pub mod unified;

pub use json::JSON_COLUMN;
pub use unified::{infer_format_from_path, parse_table, read_table};
