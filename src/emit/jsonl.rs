use std::io::Write;

use serde::de::IgnoredAny;

use crate::error::ProcessResult;
use crate::ingestion::json::compact_json;

/// Write each JSON text compactly, one value per line. Empty texts are skipped.
///
/// Tokens are copied as written, so key order and number text are preserved.
pub fn write_jsonl<'a>(texts: impl IntoIterator<Item = &'a str>) -> ProcessResult<Vec<u8>> {
    let mut out = Vec::new();
    for text in texts {
        if text.trim().is_empty() {
            continue;
        }
        serde_json::from_str::<IgnoredAny>(text)?;
        out.write_all(compact_json(text).as_bytes())?;
        out.write_all(b"\n")?;
    }
    Ok(out)
}
