//! Reducer pass
//!
//! A reducer invocation sees every record of one URL, already grouped by the
//! shuffle. It emits exactly one record whose state is the OR of all input
//! states. The key comes from the first record; grouping is trusted, not
//! re-checked.

use crate::state::Record;
use crate::{CrawlError, Result};
use std::io::{BufRead, Write};

/// Merges one key group into a single record
///
/// # Errors
///
/// `CrawlError::EmptyGroup` if `records` yields nothing.
pub fn reduce_group<I>(records: I) -> Result<Record>
where
    I: IntoIterator<Item = Record>,
{
    let mut records = records.into_iter();
    let first = records.next().ok_or(CrawlError::EmptyGroup)?;

    let state = records.fold(first.state, |acc, record| acc | record.state);
    Ok(Record::new(first.url, state))
}

/// Parses and merges one key group given as wire lines
///
/// Every line is validated before anything is returned, so a malformed
/// record anywhere in the group yields no output at all.
pub fn reduce_lines<I, S>(lines: I) -> Result<Record>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let records = lines
        .into_iter()
        .map(|line| Record::parse_line(line.as_ref()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    reduce_group(records)
}

/// Runs the reducer over a stream holding one key group
pub fn run<R, W>(reader: R, writer: &mut W) -> Result<Record>
where
    R: BufRead,
    W: Write,
{
    let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
    let merged = reduce_lines(&lines)?;

    writeln!(writer, "{}", merged)?;
    writer.flush()?;

    tracing::debug!(
        "Reduced {} records for {} to {}",
        lines.len(),
        merged.url,
        merged.state
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordError;
    use std::io::Cursor;

    #[test]
    fn test_merge_in_any_order() {
        let a = vec![Record::discovered("u"), Record::visited("u")];
        let b = vec![Record::visited("u"), Record::discovered("u")];

        assert_eq!(reduce_group(a).unwrap(), Record::visited("u"));
        assert_eq!(reduce_group(b).unwrap(), Record::visited("u"));
    }

    #[test]
    fn test_all_discovered_stays_discovered() {
        let group = vec![Record::discovered("u"), Record::discovered("u")];
        assert_eq!(reduce_group(group).unwrap(), Record::discovered("u"));
    }

    #[test]
    fn test_single_record_passes_through() {
        assert_eq!(
            reduce_group([Record::visited("u")]).unwrap(),
            Record::visited("u")
        );
    }

    #[test]
    fn test_idempotent() {
        let once = reduce_group(vec![Record::discovered("u"), Record::visited("u")]).unwrap();
        let twice = reduce_group(vec![once.clone(), once.clone()]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_first_record_sets_key() {
        let group = vec![Record::discovered("first"), Record::visited("second")];
        assert_eq!(reduce_group(group).unwrap(), Record::visited("first"));
    }

    #[test]
    fn test_empty_group() {
        assert!(matches!(
            reduce_group(Vec::new()),
            Err(CrawlError::EmptyGroup)
        ));
    }

    #[test]
    fn test_reduce_lines_rejects_bad_state() {
        let err = reduce_lines(["u\t1", "u\tmaybe", "u\t0"]).unwrap_err();
        assert!(matches!(
            err,
            CrawlError::MalformedRecord(RecordError::InvalidState(ref s)) if s == "maybe"
        ));
    }

    #[test]
    fn test_run_writes_single_line() {
        let input = Cursor::new("http://a.com\t0\nhttp://a.com\t1\nhttp://a.com\t0\n");
        let mut output = Vec::new();

        let merged = run(input, &mut output).unwrap();

        assert_eq!(merged, Record::visited("http://a.com"));
        assert_eq!(String::from_utf8(output).unwrap(), "http://a.com\t1\n");
    }

    #[test]
    fn test_run_emits_nothing_on_malformed_record() {
        let input = Cursor::new("http://a.com\t1\nhttp://a.com\t3\n");
        let mut output = Vec::new();

        assert!(run(input, &mut output).is_err());
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_on_empty_input() {
        let mut output = Vec::new();
        assert!(matches!(
            run(Cursor::new(""), &mut output),
            Err(CrawlError::EmptyGroup)
        ));
        assert!(output.is_empty());
    }
}
