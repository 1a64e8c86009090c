//! JSON and JSONL parsing.
//!
//! Both formats produce a single-column table whose column is named [`JSON_COLUMN`]; each cell
//! holds the JSON text of one element. Element text is kept as written (only insignificant
//! whitespace is dropped), so numbers of any size or precision pass through unchanged.
//!
//! Supported inputs:
//! - A JSON array: `[{"a":1}, {"a":2}]` (each element is one row, stored compactly)
//! - Newline-delimited JSON: `{"a":1}\n{"a":2}\n` (each non-blank line is one row)

use serde::de::IgnoredAny;
use serde_json::value::RawValue;

use crate::error::{ProcessError, ProcessResult};
use crate::types::ParsedTable;

/// Column name used for JSON and JSONL rows.
pub const JSON_COLUMN: &str = "data";

/// Parse a JSON array into a single-column [`ParsedTable`].
pub fn parse_json(input: &[u8]) -> ProcessResult<ParsedTable> {
    let text = String::from_utf8_lossy(input);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProcessError::EmptyInput);
    }

    let document: &RawValue = serde_json::from_str(trimmed)
        .map_err(|e| ProcessError::malformed(format!("invalid json: {e}")))?;
    if !document.get().starts_with('[') {
        return Err(ProcessError::malformed(
            "json input must be a top-level array",
        ));
    }
    let items: Vec<&RawValue> = serde_json::from_str(document.get())
        .map_err(|e| ProcessError::malformed(format!("invalid json: {e}")))?;
    if items.is_empty() {
        return Err(ProcessError::EmptyInput);
    }

    let rows = items
        .iter()
        .map(|item| vec![compact_json(item.get())])
        .collect();
    Ok(ParsedTable::new(vec![JSON_COLUMN.to_string()], rows))
}

/// Drop whitespace outside string literals.
///
/// `text` is expected to be valid JSON; tokens are copied byte for byte.
pub fn compact_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            ' ' | '\t' | '\n' | '\r' => {}
            '"' => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Parse newline-delimited JSON into a single-column [`ParsedTable`].
///
/// Blank lines are skipped; any other line must be valid JSON.
pub fn parse_jsonl(input: &[u8]) -> ProcessResult<ParsedTable> {
    let text = String::from_utf8_lossy(input);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        serde_json::from_str::<IgnoredAny>(line).map_err(|e| {
            ProcessError::malformed(format!("invalid jsonl at line {}: {e}", i + 1))
        })?;
        rows.push(vec![line.to_owned()]);
    }

    if rows.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    Ok(ParsedTable::new(vec![JSON_COLUMN.to_string()], rows))
}
