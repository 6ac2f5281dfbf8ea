// src/engine/dedup.rs

//! Fired-occurrence bookkeeping.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::trace;

use crate::schedule::EntryId;

/// Set of `(entry, calendar day)` pairs that already fired.
///
/// Keys are only ever compared against "today", so keys from earlier days are
/// inert; [`expire`](Self::expire) drops them.
#[derive(Debug, Default, Clone)]
pub struct Deduplicator {
    fired: HashSet<(EntryId, NaiveDate)>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self, entry: EntryId, day: NaiveDate) -> bool {
        self.fired.contains(&(entry, day))
    }

    /// Record a firing. Returns `false` if it was already recorded.
    pub fn mark_fired(&mut self, entry: EntryId, day: NaiveDate) -> bool {
        self.fired.insert((entry, day))
    }

    /// Remove every key for a day strictly before `before_day`.
    pub fn expire(&mut self, before_day: NaiveDate) -> usize {
        let before = self.fired.len();
        self.fired.retain(|(_, day)| *day >= before_day);
        let removed = before - self.fired.len();
        if removed > 0 {
            trace!(removed, %before_day, "expired fired keys");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn mark_is_idempotent_within_a_day() {
        let mut dedup = Deduplicator::new();
        assert!(!dedup.has_fired(EntryId(0), day(1)));
        assert!(dedup.mark_fired(EntryId(0), day(1)));
        assert!(!dedup.mark_fired(EntryId(0), day(1)));
        assert!(dedup.has_fired(EntryId(0), day(1)));
        assert!(!dedup.has_fired(EntryId(1), day(1)));
        assert!(!dedup.has_fired(EntryId(0), day(2)));
    }

    #[test]
    fn expire_keeps_the_boundary_day() {
        let mut dedup = Deduplicator::new();
        dedup.mark_fired(EntryId(0), day(1));
        dedup.mark_fired(EntryId(1), day(2));
        dedup.mark_fired(EntryId(2), day(3));

        assert_eq!(dedup.expire(day(2)), 1);
        assert!(!dedup.has_fired(EntryId(0), day(1)));
        assert!(dedup.has_fired(EntryId(1), day(2)));
        assert_eq!(dedup.len(), 2);
        assert_eq!(dedup.expire(day(2)), 0);
    }
}
