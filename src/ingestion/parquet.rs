//! Parquet parsing.

use bytes::Bytes;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;

use crate::error::{ProcessError, ProcessResult};
use crate::types::ParsedTable;

/// Parse an in-memory Parquet file into a [`ParsedTable`].
///
/// Notes:
/// - Headers are the top-level field names of the file schema, in schema order
/// - Uses the Parquet record API (`RowIter`); every value is stringified by its native type
/// - Truncated or corrupt files fail with [`ProcessError::Parquet`]
pub fn parse_parquet(input: &[u8]) -> ProcessResult<ParsedTable> {
    if input.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    let reader = SerializedFileReader::new(Bytes::copy_from_slice(input))?;

    let headers: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for row_res in reader.get_row_iter(None)? {
        let row = row_res?;

        let mut out_row = vec![String::new(); headers.len()];
        for (name, field) in row.get_column_iter() {
            if let Some(pos) = headers.iter().position(|h| h == name) {
                out_row[pos] = field_to_string(field);
            }
        }
        rows.push(out_row);
    }

    let table = ParsedTable::new(headers, rows);
    if table.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    Ok(table)
}

fn field_to_string(f: &Field) -> String {
    match f {
        Field::Null => String::new(),
        Field::Bool(b) => b.to_string(),
        Field::Byte(v) => v.to_string(),
        Field::Short(v) => v.to_string(),
        Field::Int(v) => v.to_string(),
        Field::Long(v) => v.to_string(),
        Field::UByte(v) => v.to_string(),
        Field::UShort(v) => v.to_string(),
        Field::UInt(v) => v.to_string(),
        Field::ULong(v) => v.to_string(),
        Field::Float(v) => v.to_string(),
        Field::Double(v) => v.to_string(),
        Field::Str(s) => s.clone(),
        Field::Bytes(b) => String::from_utf8_lossy(b.data()).into_owned(),
        // Dates, timestamps, decimals and nested values use their display text.
        other => other.to_string(),
    }
}
