#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use crate::error::{ProcessError, ProcessResult};
use crate::types::ParsedTable;

/// Parse the first sheet of an in-memory `.xlsx` workbook into a [`ParsedTable`].
///
/// Behavior:
/// - Only the first sheet is read
/// - The first non-empty row is the header row; rows above it are ignored
/// - Cells are stringified by their native type; whole floats print without a fraction
/// - Rows shorter than the header are padded; cells beyond the header width are dropped
pub fn parse_xlsx(input: &[u8]) -> ProcessResult<ParsedTable> {
    if input.is_empty() {
        return Err(ProcessError::EmptyInput);
    }

    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(input)).map_err(calamine::Error::from)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(calamine::Error::from)?,
        None => {
            return Err(ProcessError::malformed("workbook has no sheets"));
        }
    };

    let mut rows_iter = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Err(ProcessError::EmptyInput),
    };
    let width = headers.len();

    let rows = rows_iter
        .map(|row| {
            let mut out: Vec<String> = row.iter().take(width).map(cell_to_string).collect();
            out.resize(width, String::new());
            out
        })
        .collect();

    Ok(ParsedTable::new(headers, rows))
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // `Display` already prints whole floats without a fraction, at any magnitude.
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}
