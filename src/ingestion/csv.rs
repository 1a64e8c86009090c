//! CSV and TSV parsing.

use crate::error::{ProcessError, ProcessResult};
use crate::types::ParsedTable;

/// Parse comma-separated bytes into a [`ParsedTable`].
pub fn parse_csv(input: &[u8]) -> ProcessResult<ParsedTable> {
    parse_delimited(input, b',')
}

/// Parse tab-separated bytes into a [`ParsedTable`].
pub fn parse_tsv(input: &[u8]) -> ProcessResult<ParsedTable> {
    parse_delimited(input, b'\t')
}

/// Parse delimited bytes with a header row.
///
/// Rules:
///
/// - The first record is the header row; duplicate names are kept.
/// - A record with fewer cells than the header is right-padded with empty strings.
/// - A record with more cells than the header is a fatal [`ProcessError::MalformedTable`].
/// - Blank lines are skipped.
pub fn parse_delimited(input: &[u8], delimiter: u8) -> ProcessResult<ParsedTable> {
    if input.is_empty() {
        return Err(ProcessError::EmptyInput);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let width = headers.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(ProcessError::malformed(format!(
                "row {} has {} fields but the header has {width}",
                row_idx0 + 1,
                record.len()
            )));
        }

        let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    let table = ParsedTable::new(headers, rows);
    if table.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    Ok(table)
}
