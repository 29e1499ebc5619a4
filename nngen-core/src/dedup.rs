//! First-seen deduplication of growing candidate arrays.
//!
//! The index tracks which entries have already been accepted. Callers append
//! freshly sampled candidates after the confirmed prefix and ask the index to
//! compact them; the prefix itself is never revisited.

use std::{collections::HashSet, hash::Hash};

/// Tracks the confirmed-unique prefix of a working array.
///
/// # Examples
/// ```
/// use nngen_core::DeduplicationIndex;
///
/// let mut index = DeduplicationIndex::new();
/// let mut working = vec![3, 1, 3, 2, 1];
/// assert_eq!(index.compact(&mut working, None), 3);
/// assert_eq!(working, [3, 1, 2]);
///
/// working.extend([2, 5, 4]);
/// assert_eq!(index.compact(&mut working, Some(4)), 4);
/// assert_eq!(working, [3, 1, 2, 5]);
/// ```
#[derive(Clone, Debug)]
pub struct DeduplicationIndex<K> {
    seen: HashSet<K>,
    unique: usize,
    duplicates: u64,
}

impl<K> Default for DeduplicationIndex<K> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
            unique: 0,
            duplicates: 0,
        }
    }
}

impl<K: Copy + Eq + Hash> DeduplicationIndex<K> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index whose confirmed prefix is `prefix`.
    ///
    /// The prefix is assumed unique; repeated entries still occupy their
    /// positions but are recorded once.
    #[must_use]
    pub fn seeded(prefix: &[K]) -> Self {
        Self {
            seen: prefix.iter().copied().collect(),
            unique: prefix.len(),
            duplicates: 0,
        }
    }

    /// Returns the length of the confirmed-unique prefix.
    #[must_use]
    #[rustfmt::skip]
    pub fn unique_count(&self) -> usize { self.unique }

    /// Number of repeated entries dropped by [`DeduplicationIndex::compact`].
    #[must_use]
    #[rustfmt::skip]
    pub fn duplicates_seen(&self) -> u64 { self.duplicates }

    /// Returns `true` when `entry` has already been accepted.
    #[must_use]
    pub fn contains(&self, entry: &K) -> bool {
        self.seen.contains(entry)
    }

    /// Compacts the suffix of `working` after the confirmed prefix.
    ///
    /// Keeps the first occurrence of every entry not already accepted, moves
    /// it directly behind the prefix, and stops once `limit` unique entries
    /// are confirmed. The array is truncated to the new unique count, which
    /// is returned.
    pub fn compact(&mut self, working: &mut Vec<K>, limit: Option<usize>) -> usize {
        let limit = limit.unwrap_or(usize::MAX);
        let mut write = self.unique;
        for read in self.unique..working.len() {
            if write >= limit {
                break;
            }
            let entry = working[read];
            if self.seen.insert(entry) {
                working[write] = entry;
                write += 1;
            } else {
                self.duplicates += 1;
            }
        }
        working.truncate(write);
        self.unique = write;
        write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;

    #[test]
    fn seeded_prefix_rejects_repeats() {
        let existing = [Edge::new(0, 1), Edge::new(1, 2)];
        let mut index = DeduplicationIndex::seeded(&existing);
        let mut working = existing.to_vec();
        working.extend([Edge::new(1, 2), Edge::new(2, 0), Edge::new(0, 1)]);

        assert_eq!(index.compact(&mut working, None), 3);
        assert_eq!(working, [Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 0)]);
        assert!(index.contains(&Edge::new(2, 0)));
        assert_eq!(index.duplicates_seen(), 2);
    }

    #[test]
    fn limit_leaves_overshoot_unrecorded() {
        let mut index = DeduplicationIndex::new();
        let mut working = vec![1, 2, 3, 4];
        assert_eq!(index.compact(&mut working, Some(2)), 2);
        assert_eq!(working, [1, 2]);
        assert!(!index.contains(&3));

        working.push(3);
        assert_eq!(index.compact(&mut working, Some(3)), 3);
        assert_eq!(working, [1, 2, 3]);
    }

    #[test]
    fn compaction_never_touches_the_confirmed_prefix() {
        let mut index = DeduplicationIndex::new();
        let mut working = vec![9, 8];
        index.compact(&mut working, None);
        working.extend([9, 9, 7]);
        assert_eq!(index.compact(&mut working, None), 3);
        assert_eq!(working, [9, 8, 7]);
    }

    #[test]
    fn limit_below_prefix_keeps_prefix() {
        let mut index = DeduplicationIndex::seeded(&[1, 2, 3]);
        let mut working = vec![1, 2, 3, 4];
        assert_eq!(index.compact(&mut working, Some(1)), 3);
        assert_eq!(working, [1, 2, 3]);
    }
}
