use crate::error::ProcessResult;

/// Write one LTSV line per row, carrying every header key (missing values are written empty).
pub fn write_ltsv(headers: &[String], rows: &[Vec<String>]) -> ProcessResult<Vec<u8>> {
    let mut out = Vec::new();
    for row in rows {
        let line = headers
            .iter()
            .enumerate()
            .map(|(i, key)| format!("{key}:{}", row.get(i).map_or("", String::as_str)))
            .collect::<Vec<_>>()
            .join("\t");
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    Ok(out)
}
