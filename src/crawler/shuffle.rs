//! Partitioning and shuffling between passes
//!
//! `partition` splits a hop's input into contiguous slices for the map jobs.
//! `shuffle` groups mapper output by URL in sorted key order so that every
//! reduce job sees all records of exactly one key.

use crate::state::Record;
use std::collections::BTreeMap;

/// Splits `records` into at most `jobs` contiguous, non-empty partitions
///
/// Partition sizes differ by at most one, larger partitions first. Input
/// order is preserved across the concatenation of all partitions.
pub fn partition(records: Vec<Record>, jobs: usize) -> Vec<Vec<Record>> {
    let jobs = jobs.max(1).min(records.len());
    if jobs == 0 {
        return Vec::new();
    }

    let base = records.len() / jobs;
    let extra = records.len() % jobs;

    let mut partitions = Vec::with_capacity(jobs);
    let mut rest = records.into_iter();
    for job in 0..jobs {
        let size = base + usize::from(job < extra);
        partitions.push(rest.by_ref().take(size).collect());
    }
    partitions
}

/// Groups records by URL, keys in ascending order
///
/// Within a group, records keep the order they arrived in.
pub fn shuffle<I>(records: I) -> BTreeMap<String, Vec<Record>>
where
    I: IntoIterator<Item = Record>,
{
    let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.url.clone()).or_default().push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::discovered(format!("u{i}"))).collect()
    }

    #[test]
    fn test_partition_even() {
        let parts = partition(records(6), 3);
        assert_eq!(parts.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2, 2]);
    }

    #[test]
    fn test_partition_uneven() {
        let parts = partition(records(7), 3);
        assert_eq!(parts.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 2, 2]);
    }

    #[test]
    fn test_partition_preserves_order() {
        let input = records(5);
        let flattened: Vec<Record> = partition(input.clone(), 2).into_iter().flatten().collect();
        assert_eq!(flattened, input);
    }

    #[test]
    fn test_more_jobs_than_records() {
        let parts = partition(records(2), 8);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.len() == 1));
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(Vec::new(), 4).is_empty());
    }

    #[test]
    fn test_zero_jobs_treated_as_one() {
        assert_eq!(partition(records(3), 0).len(), 1);
    }

    #[test]
    fn test_shuffle_groups_and_sorts() {
        let groups = shuffle(vec![
            Record::discovered("b"),
            Record::visited("a"),
            Record::visited("b"),
            Record::discovered("a"),
        ]);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            groups["b"],
            vec![Record::discovered("b"), Record::visited("b")]
        );
    }
}
