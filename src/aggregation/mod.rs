//! Metric Aggregator: groups raw evaluation records by (group key, period)
//! and computes error-rate snapshots.
//!
//! Category rates count calls with at least one error in the category, not
//! summed item flags, so a call with three word-choice errors still counts
//! once. The overall rate counts the union across both categories, which is
//! why it can be less than the category rates summed.

pub mod period;

use crate::core::{
    AgentSnapshot, ErrorCategory, EvaluationRecord, Granularity, GroupKey, MetricSnapshot, Period,
    TenureGroup,
};
use crate::filters::DateRange;
use std::collections::BTreeMap;

/// Which dimensions of the group key a query populates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupDimensions {
    pub center: bool,
    pub service: bool,
    pub channel: bool,
    pub tenure: bool,
}

impl GroupDimensions {
    /// No dimensions: everything lands in one global group.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by_center() -> Self {
        Self {
            center: true,
            ..Self::default()
        }
    }

    /// The group key `record` belongs to under these dimensions.
    pub fn key_for(&self, record: &EvaluationRecord) -> GroupKey {
        GroupKey {
            center: self.center.then(|| record.center.clone()),
            service: self.service.then(|| record.service.clone()),
            channel: self.channel.then(|| record.channel.clone()),
            tenure_group: self
                .tenure
                .then(|| TenureGroup::from_months(record.tenure_months)),
        }
    }
}

#[derive(Default)]
struct Accumulator {
    total: u32,
    attitude_calls: u32,
    ops_calls: u32,
    any_calls: u32,
    per_item: BTreeMap<crate::core::ErrorItem, u32>,
}

impl Accumulator {
    fn add(&mut self, record: &EvaluationRecord) {
        self.total += 1;
        if record.has_category_error(ErrorCategory::Attitude) {
            self.attitude_calls += 1;
        }
        if record.has_category_error(ErrorCategory::Operations) {
            self.ops_calls += 1;
        }
        if record.has_any_error() {
            self.any_calls += 1;
        }
        for item in &record.errors {
            *self.per_item.entry(*item).or_default() += 1;
        }
    }

    fn into_snapshot(self, group: GroupKey, period: Period) -> MetricSnapshot {
        if self.total == 0 {
            return MetricSnapshot::empty(group, period);
        }
        let total = self.total as f64;
        MetricSnapshot {
            group,
            period,
            total_evaluations: self.total,
            attitude_error_rate: self.attitude_calls as f64 / total * 100.0,
            ops_error_rate: self.ops_calls as f64 / total * 100.0,
            overall_error_rate: self.any_calls as f64 / total * 100.0,
            per_item_error_counts: self.per_item,
            empty: false,
        }
    }
}

/// Aggregate records into one snapshot per (group, period).
///
/// Every group that appears in the filtered records gets a snapshot for
/// every period overlapping the range, so each group's series is contiguous;
/// periods without records yield `empty` snapshots. Output is sorted by
/// group, then period ascending.
pub fn aggregate(
    records: &[EvaluationRecord],
    dims: &GroupDimensions,
    granularity: Granularity,
    range: &DateRange,
) -> Vec<MetricSnapshot> {
    let periods = period::periods_in_range(range, granularity);
    log::debug!(
        "aggregating {} records into {} periods",
        records.len(),
        periods.len()
    );

    let mut buckets: BTreeMap<(GroupKey, Period), Accumulator> = BTreeMap::new();
    for record in records.iter().filter(|r| range.contains(r.date)) {
        let key = dims.key_for(record);
        let period = period::period_containing(record.date, granularity);
        buckets.entry((key, period)).or_default().add(record);
    }

    let groups: Vec<GroupKey> = {
        let mut seen: Vec<GroupKey> = buckets.keys().map(|(g, _)| g.clone()).collect();
        seen.dedup();
        seen
    };

    let mut snapshots = Vec::with_capacity(groups.len() * periods.len());
    for group in groups {
        for period in &periods {
            let snapshot = match buckets.remove(&(group.clone(), *period)) {
                Some(acc) => acc.into_snapshot(group.clone(), *period),
                None => MetricSnapshot::empty(group.clone(), *period),
            };
            snapshots.push(snapshot);
        }
    }
    snapshots
}

/// Aggregate an entire range as a single period: one snapshot per group
/// covering `range` wholesale, sorted by group. The report composer builds
/// its totals from these so it never recomputes rates itself.
pub fn aggregate_range(
    records: &[EvaluationRecord],
    dims: &GroupDimensions,
    range: &DateRange,
) -> Vec<MetricSnapshot> {
    let period = Period::new(range.start, range.end);
    let mut buckets: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    for record in records.iter().filter(|r| range.contains(r.date)) {
        buckets.entry(dims.key_for(record)).or_default().add(record);
    }

    buckets
        .into_iter()
        .map(|(group, acc)| acc.into_snapshot(group, period))
        .collect()
}

/// Aggregate records into per-agent snapshots for one period, sorted by
/// agent id. Input to the watchlist selector and the distinct-agent counts
/// in reports.
pub fn aggregate_agents(records: &[EvaluationRecord], period: Period) -> Vec<AgentSnapshot> {
    let mut buckets: BTreeMap<String, Accumulator> = BTreeMap::new();
    for record in records.iter().filter(|r| period.contains(r.date)) {
        buckets
            .entry(record.agent_id.clone())
            .or_default()
            .add(record);
    }

    buckets
        .into_iter()
        .map(|(agent_id, acc)| {
            let total = acc.total;
            let rate = if total == 0 {
                0.0
            } else {
                acc.any_calls as f64 / total as f64 * 100.0
            };
            AgentSnapshot {
                agent_id,
                period,
                total_evaluations: total,
                overall_error_rate: rate,
                per_item_error_counts: acc.per_item,
            }
        })
        .collect()
}

/// Snapshots for one group, non-empty only, sorted by period. The usable
/// series for trend and forecast input.
pub fn usable_series(snapshots: &[MetricSnapshot]) -> Vec<&MetricSnapshot> {
    let mut series: Vec<&MetricSnapshot> = snapshots.iter().filter(|s| !s.empty).collect();
    series.sort_by_key(|s| s.period);
    series
}
