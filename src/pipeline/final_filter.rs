//! Final filter pass
//!
//! Runs once after the last hop. The state field is ignored; a record
//! survives if its URL passes `is_valid_url`, and is written as the bare URL.
//! Everything else is dropped without a trace.

use crate::state::{Record, FIELD_SEPARATOR};
use crate::url::is_valid_url;
use std::io::{BufRead, Write};

/// Returns the URL of a line if it survives the filter
///
/// Accepts both `url<TAB>state` lines and bare `url` lines, so feeding the
/// filter its own output is a no-op.
pub fn filter_line(line: &str) -> Option<&str> {
    let line = line.trim_end();
    let url = line.split(FIELD_SEPARATOR).next().unwrap_or_default();
    is_valid_url(url).then_some(url)
}

/// Filters in-memory records, preserving order
pub fn filter_records(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter(|record| is_valid_url(&record.url))
        .map(|record| record.url.clone())
        .collect()
}

/// Runs the filter over a line stream and returns the number of URLs kept
pub fn run<R, W>(reader: R, writer: &mut W) -> std::io::Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut kept = 0;
    for line in reader.lines() {
        let line = line?;
        if let Some(url) = filter_line(&line) {
            writeln!(writer, "{}", url)?;
            kept += 1;
        }
    }
    writer.flush()?;
    Ok(kept)
}
