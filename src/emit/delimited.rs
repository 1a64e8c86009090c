use csv::{QuoteStyle, WriterBuilder};

use crate::error::ProcessResult;

/// Write a header row plus `rows` with the `csv` writer.
pub fn write_delimited(
    headers: &[String],
    rows: &[Vec<String>],
    delimiter: u8,
) -> ProcessResult<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    wtr.into_inner()
        .map_err(|e| crate::ProcessError::Io(e.into_error()))
}
