//! Optional caller-side snapshot memoization.
//!
//! Snapshots are pure recomputations, so caching them is purely an
//! optimization: a hit must return exactly what a recompute would. The
//! record store stays the source of truth — callers invalidate a period as
//! soon as new records land in it.

use crate::core::{GroupKey, MetricSnapshot, Period};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: HashMap<(GroupKey, Period), MetricSnapshot>,
    hits: usize,
    misses: usize,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot or `compute()`, memoized under (group, period).
    pub fn get_or_compute<F>(&mut self, group: &GroupKey, period: Period, compute: F) -> MetricSnapshot
    where
        F: FnOnce() -> MetricSnapshot,
    {
        let key = (group.clone(), period);
        if let Some(snapshot) = self.entries.get(&key) {
            self.hits += 1;
            return snapshot.clone();
        }
        self.misses += 1;
        let snapshot = compute();
        self.entries.insert(key, snapshot.clone());
        snapshot
    }

    /// Drop every group's entry for `period`. Call when new records arrive
    /// for that period.
    pub fn invalidate_period(&mut self, period: Period) {
        let before = self.entries.len();
        self.entries.retain(|(_, p), _| *p != period);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            log::debug!("invalidated {dropped} cached snapshots for {period}");
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period(day: u32) -> Period {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        Period::new(date, date)
    }

    #[test]
    fn second_lookup_hits() {
        let mut cache = SnapshotCache::new();
        let group = GroupKey::global();

        let first = cache.get_or_compute(&group, period(1), || {
            MetricSnapshot::empty(group.clone(), period(1))
        });
        let second = cache.get_or_compute(&group, period(1), || unreachable!("must hit"));

        assert_eq!(first, second);
        assert!(cache.hit_rate() > 0.0);
    }

    #[test]
    fn invalidation_forces_recompute() {
        let mut cache = SnapshotCache::new();
        let group = GroupKey::global();

        cache.get_or_compute(&group, period(1), || {
            MetricSnapshot::empty(group.clone(), period(1))
        });
        cache.invalidate_period(period(1));
        assert!(cache.is_empty());

        let mut recomputed = false;
        cache.get_or_compute(&group, period(1), || {
            recomputed = true;
            MetricSnapshot::empty(group.clone(), period(1))
        });
        assert!(recomputed);
    }
}
