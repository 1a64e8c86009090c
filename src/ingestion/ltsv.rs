//! LTSV (Labeled Tab-separated Values) parsing.
//!
//! Each line is a tab-separated list of `key:value` pairs. Lines may carry different key sets;
//! the table header is the union of every key seen, in first-seen order.

use std::collections::HashMap;

use crate::error::{ProcessError, ProcessResult};
use crate::types::ParsedTable;

/// Parse LTSV bytes into a [`ParsedTable`].
///
/// - Empty and whitespace-only lines are skipped and do not produce rows.
/// - Each pair is split on its first `:` (values may contain `:`).
/// - A key repeated within one line keeps its first value.
/// - Keys missing from a line read as empty strings.
/// - A non-empty token without `:` is a fatal [`ProcessError::MalformedTable`].
pub fn parse_ltsv(input: &[u8]) -> ProcessResult<ParsedTable> {
    if input.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    let text = String::from_utf8_lossy(input);

    let mut headers: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut sparse_rows: Vec<Vec<(usize, String)>> = Vec::new();

    for (line_idx0, line) in text.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        let mut pairs: Vec<(usize, String)> = Vec::new();
        for token in line.split('\t') {
            if token.is_empty() {
                continue;
            }
            let (key, value) = token.split_once(':').ok_or_else(|| {
                ProcessError::malformed(format!(
                    "ltsv line {}: token '{token}' is not a key:value pair",
                    line_idx0 + 1
                ))
            })?;

            let pos = match positions.get(key) {
                Some(&pos) => pos,
                None => {
                    let pos = headers.len();
                    headers.push(key.to_owned());
                    positions.insert(key.to_owned(), pos);
                    pos
                }
            };
            if pairs.iter().all(|(p, _)| *p != pos) {
                pairs.push((pos, value.to_owned()));
            }
        }
        sparse_rows.push(pairs);
    }

    let width = headers.len();
    let rows = sparse_rows
        .into_iter()
        .map(|pairs| {
            let mut row = vec![String::new(); width];
            for (pos, value) in pairs {
                row[pos] = value;
            }
            row
        })
        .collect();

    let table = ParsedTable::new(headers, rows);
    if table.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    Ok(table)
}
