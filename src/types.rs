//! Core data model types.
//!
//! Input formats are described by a [`FileFormat`] (a base [`FileType`] plus a
//! [`Compression`]). Parsers produce a [`ParsedTable`] of string cells; the row pipeline coerces
//! cells into typed [`Value`]s according to each field's [`DataType`].

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Base file format, independent of compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Labeled tab-separated values (`key:value` pairs).
    Ltsv,
    /// A JSON array; each element is one row.
    Json,
    /// Newline-delimited JSON; each line is one row.
    Jsonl,
    /// Apache Parquet.
    Parquet,
    /// Excel workbook (first sheet only).
    Xlsx,
}

impl FileType {
    /// Parse a base format from a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "ltsv" => Some(Self::Ltsv),
            "json" => Some(Self::Json),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            "parquet" => Some(Self::Parquet),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Canonical extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Ltsv => "ltsv",
            Self::Json => "json",
            Self::Jsonl => "jsonl",
            Self::Parquet => "parquet",
            Self::Xlsx => "xlsx",
        }
    }

    /// The format processed data is emitted in.
    ///
    /// Delimited and key/value formats round-trip; JSON becomes JSONL; binary formats become CSV.
    pub fn output_type(&self) -> FileType {
        match self {
            Self::Csv | Self::Parquet | Self::Xlsx => Self::Csv,
            Self::Tsv => Self::Tsv,
            Self::Ltsv => Self::Ltsv,
            Self::Json | Self::Jsonl => Self::Jsonl,
        }
    }

    /// Whether rows of this format carry a single `data` column holding raw JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::Jsonl)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Compression wrapping the base format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Plain, uncompressed input.
    #[default]
    None,
    /// gzip (`.gz`).
    Gzip,
    /// bzip2 (`.bz2`).
    Bzip2,
    /// xz (`.xz`).
    Xz,
    /// Zstandard (`.zst`).
    Zstd,
    /// zlib (`.z`).
    Zlib,
    /// Snappy framed stream (`.snappy`).
    Snappy,
    /// S2 stream (`.s2`).
    S2,
    /// LZ4 frame (`.lz4`).
    Lz4,
}

impl Compression {
    /// Parse a compression codec from a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "gz" | "gzip" => Some(Self::Gzip),
            "bz2" => Some(Self::Bzip2),
            "xz" => Some(Self::Xz),
            "zst" | "zstd" => Some(Self::Zstd),
            "z" | "zlib" => Some(Self::Zlib),
            "snappy" => Some(Self::Snappy),
            "s2" => Some(Self::S2),
            "lz4" => Some(Self::Lz4),
            _ => None,
        }
    }

    /// Canonical extension for this codec (`None` for uncompressed input).
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Gzip => Some("gz"),
            Self::Bzip2 => Some("bz2"),
            Self::Xz => Some("xz"),
            Self::Zstd => Some("zst"),
            Self::Zlib => Some("z"),
            Self::Snappy => Some("snappy"),
            Self::S2 => Some("s2"),
            Self::Lz4 => Some("lz4"),
        }
    }

    /// Human-readable codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
            Self::Zlib => "zlib",
            Self::Snappy => "snappy",
            Self::S2 => "s2",
            Self::Lz4 => "lz4",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A base format plus the compression wrapping it, e.g. `csv.gz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FileFormat {
    /// Base format.
    pub file_type: FileType,
    /// Compression codec.
    pub compression: Compression,
}

impl FileFormat {
    /// Create a format description.
    pub fn new(file_type: FileType, compression: Compression) -> Self {
        Self {
            file_type,
            compression,
        }
    }

    /// Uncompressed input of the given base format.
    pub fn plain(file_type: FileType) -> Self {
        Self::new(file_type, Compression::None)
    }

    /// Infer the format from a stacked extension such as `data.csv.gz` or `events.jsonl`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?;
        let mut parts = name.rsplit('.');
        let last = parts.next()?;

        if let Some(compression) = Compression::from_extension(last) {
            let base = parts.next()?;
            let file_type = FileType::from_extension(base)?;
            return Some(Self::new(file_type, compression));
        }

        // A bare name with no dot is not an extension.
        if last == name {
            return None;
        }
        FileType::from_extension(last).map(Self::plain)
    }
}

impl From<FileType> for FileFormat {
    fn from(file_type: FileType) -> Self {
        Self::plain(file_type)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.compression.extension() {
            Some(ext) => write!(f, "{}.{ext}", self.file_type),
            None => write!(f, "{}", self.file_type),
        }
    }
}

/// Semantic target type of a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// UTF-8 string.
    Utf8,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point number.
    Float32,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// A type the pipeline cannot populate from a single cell (nested records, collections).
    ///
    /// The description is used in `type_conversion` error messages.
    Unsupported(String),
}

impl DataType {
    /// Whether values of this type are compared numerically by `min`/`max`/`len`.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
                | Self::Float32
                | Self::Float64
        )
    }

    /// The zero value for this type.
    pub fn zero(&self) -> Value {
        match self {
            Self::Utf8 => Value::Utf8(String::new()),
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => Value::Int64(0),
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => Value::UInt64(0),
            Self::Float32 => Value::Float32(0.0),
            Self::Float64 => Value::Float64(0.0),
            Self::Bool => Value::Bool(false),
            Self::Unsupported(_) => Value::Null,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => f.write_str("string"),
            Self::Int8 => f.write_str("int8"),
            Self::Int16 => f.write_str("int16"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::UInt8 => f.write_str("uint8"),
            Self::UInt16 => f.write_str("uint16"),
            Self::UInt32 => f.write_str("uint32"),
            Self::UInt64 => f.write_str("uint64"),
            Self::Float32 => f.write_str("float32"),
            Self::Float64 => f.write_str("float64"),
            Self::Bool => f.write_str("bool"),
            Self::Unsupported(desc) => f.write_str(desc),
        }
    }
}

/// A single typed value produced by the row pipeline.
///
/// Signed integers of every width are carried as `Int64`, unsigned as `UInt64`; the field's
/// [`DataType`] has already range-checked them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Value of an unsupported field type.
    Null,
    /// Signed integer.
    Int64(i64),
    /// Unsigned integer.
    UInt64(u64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// String view of a `Utf8` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// Signed integer view (unsigned values are converted when they fit).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            Self::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Unsigned integer view (non-negative signed values are converted).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            Self::Int64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Floating point view of any numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(v) => Some(*v),
            Self::Float32(v) => Some(f64::from(*v)),
            Self::Int64(v) => Some(*v as f64),
            Self::UInt64(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Boolean view.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// Conversion from a pipeline [`Value`] into a concrete Rust field type.
///
/// Used by [`crate::schema::RowValues::get`] when materializing records. Conversions never fail:
/// a value of the wrong shape yields the type's default.
pub trait FromValue: Sized {
    /// Convert, falling back to the type's zero value.
    fn from_value(value: &Value) -> Self;
}

impl FromValue for String {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Utf8(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Self {
        value.as_bool().unwrap_or_default()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Self {
        value.as_f64().unwrap_or_default()
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Float32(v) => *v,
            other => other.as_f64().map(|v| v as f32).unwrap_or_default(),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Self {
        value.as_i64().unwrap_or_default()
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Self {
        value.as_u64().unwrap_or_default()
    }
}

impl FromValue for i8 {
    fn from_value(value: &Value) -> Self {
        value.as_i64().and_then(|v| Self::try_from(v).ok()).unwrap_or_default()
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Self {
        value.as_i64().and_then(|v| Self::try_from(v).ok()).unwrap_or_default()
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Self {
        value.as_i64().and_then(|v| Self::try_from(v).ok()).unwrap_or_default()
    }
}

impl FromValue for u8 {
    fn from_value(value: &Value) -> Self {
        value.as_u64().and_then(|v| Self::try_from(v).ok()).unwrap_or_default()
    }
}

impl FromValue for u16 {
    fn from_value(value: &Value) -> Self {
        value.as_u64().and_then(|v| Self::try_from(v).ok()).unwrap_or_default()
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Self {
        value.as_u64().and_then(|v| Self::try_from(v).ok()).unwrap_or_default()
    }
}

/// Parser output: ordered headers plus rows of string cells.
///
/// After parser normalization every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTable {
    /// Header names in source order (duplicates allowed).
    pub headers: Vec<String>,
    /// Row-major cell storage.
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has neither headers nor rows.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}
