//! Report Composer: assembles multi-period summaries, rankings, and
//! comparisons from aggregator snapshots.
//!
//! Every figure in a report comes out of the aggregator; the composer only
//! selects, sorts, and attaches targets.

use crate::achievement;
use crate::aggregation::{self, GroupDimensions};
use crate::core::{
    ErrorItem, EvaluationRecord, Granularity, GroupKey, MetricSnapshot, Period, RateKind, Target,
    TrendDirection,
};
use crate::errors::EngineError;
use crate::filters::{validate_query, DateRange, GroupFilter};
use crate::trend;
use chrono::{Datelike, NaiveDate};
use im::Vector;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReportType {
    Week,
    Month,
    Quarter,
    HalfYear,
    Year,
    Custom,
}

impl ReportType {
    /// The calendar window of this report type containing `anchor`.
    /// `Custom` has no derived window; its range is caller-supplied.
    pub fn derive_range(&self, anchor: NaiveDate) -> Option<DateRange> {
        let period = match self {
            ReportType::Week => {
                aggregation::period::period_containing(anchor, Granularity::Week)
            }
            ReportType::Month => {
                aggregation::period::period_containing(anchor, Granularity::Month)
            }
            ReportType::Quarter => quarter_containing(anchor),
            ReportType::HalfYear => half_year_containing(anchor),
            ReportType::Year => year_containing(anchor),
            ReportType::Custom => return None,
        };
        Some(DateRange::new(period.start, period.end))
    }
}

fn quarter_containing(anchor: NaiveDate) -> Period {
    let start_month = 1 + 3 * ((anchor.month() - 1) / 3);
    months_period(anchor.year(), start_month, 3)
}

fn half_year_containing(anchor: NaiveDate) -> Period {
    let start_month = if anchor.month() <= 6 { 1 } else { 7 };
    months_period(anchor.year(), start_month, 6)
}

fn year_containing(anchor: NaiveDate) -> Period {
    months_period(anchor.year(), 1, 12)
}

fn months_period(year: i32, start_month: u32, months: u32) -> Period {
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).expect("valid month start");
    let (end_year, end_month) = if start_month + months > 12 {
        (year + 1, start_month + months - 12)
    } else {
        (year, start_month + months)
    };
    let end = NaiveDate::from_ymd_opt(end_year, end_month, 1).expect("valid month start")
        - chrono::Duration::days(1);
    Period::new(start, end)
}

/// Range-wide totals plus the comparison against the immediately preceding
/// equal-length window.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub total_evaluations: u32,
    pub distinct_agents: usize,
    pub overall_error_rate: f64,
    pub attitude_error_rate: f64,
    pub ops_error_rate: f64,
    /// Overall rate of the preceding window, when it had any evaluations.
    pub previous_overall_rate: Option<f64>,
    /// Overall rate delta against the preceding window; 0 when no prior data.
    pub delta: f64,
    pub trend: TrendDirection,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IssueCount {
    pub item: ErrorItem,
    pub count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CenterComparison {
    pub center: String,
    pub error_rate: f64,
    pub agent_count: usize,
    pub total_evaluations: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    pub overall_rate: f64,
    pub total_evaluations: u32,
    /// The target line for the day: the target scoped to the report's
    /// filter when one exists, else the global one.
    pub target_rate: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupRank {
    pub group: GroupKey,
    pub error_rate: f64,
    pub total_evaluations: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportDocument {
    pub report_type: ReportType,
    pub range: DateRange,
    pub summary: ReportSummary,
    pub top_issues: Vector<IssueCount>,
    pub center_comparison: Vector<CenterComparison>,
    pub daily_trend: Vec<DailyTrendPoint>,
    pub group_ranking: Vector<GroupRank>,
}

/// Compose a report over `range`. `records` must cover the range and its
/// preceding equal-length window (for the summary trend); out-of-window
/// records are ignored.
pub fn compose_report(
    records: &[EvaluationRecord],
    targets: &[Target],
    report_type: ReportType,
    range: DateRange,
    filter: &GroupFilter,
    trend_epsilon: f64,
) -> Result<ReportDocument, EngineError> {
    validate_query(filter, &range)?;

    let filtered: Vec<EvaluationRecord> = records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();
    log::debug!(
        "composing {report_type:?} report over {range} from {} records",
        filtered.len()
    );

    let current = aggregate_whole(&filtered, &range);
    let previous = aggregate_whole(&filtered, &range.preceding());

    Ok(ReportDocument {
        report_type,
        range,
        summary: build_summary(&filtered, &range, &current, &previous, trend_epsilon),
        top_issues: build_top_issues(&current),
        center_comparison: build_center_comparison(&filtered, &range),
        daily_trend: build_daily_trend(&filtered, targets, &range, &filter.group_key()),
        group_ranking: build_group_ranking(&filtered, &range),
    })
}

fn aggregate_whole(records: &[EvaluationRecord], range: &DateRange) -> Option<MetricSnapshot> {
    aggregation::aggregate_range(records, &GroupDimensions::none(), range)
        .into_iter()
        .next()
}

fn build_summary(
    records: &[EvaluationRecord],
    range: &DateRange,
    current: &Option<MetricSnapshot>,
    previous: &Option<MetricSnapshot>,
    trend_epsilon: f64,
) -> ReportSummary {
    let period = Period::new(range.start, range.end);
    let distinct_agents = aggregation::aggregate_agents(records, period).len();

    let (total, overall, attitude, ops) = match current {
        Some(s) => (
            s.total_evaluations,
            s.overall_error_rate,
            s.attitude_error_rate,
            s.ops_error_rate,
        ),
        None => (0, 0.0, 0.0, 0.0),
    };

    let previous_overall_rate = previous
        .as_ref()
        .filter(|s| !s.empty)
        .map(|s| s.overall_error_rate);
    let delta = previous_overall_rate.map(|p| overall - p).unwrap_or(0.0);
    let trend = match previous_overall_rate {
        Some(_) => trend::classify(delta, trend_epsilon),
        None => TrendDirection::Stable,
    };

    ReportSummary {
        total_evaluations: total,
        distinct_agents,
        overall_error_rate: overall,
        attitude_error_rate: attitude,
        ops_error_rate: ops,
        previous_overall_rate,
        delta,
        trend,
    }
}

fn build_top_issues(current: &Option<MetricSnapshot>) -> Vector<IssueCount> {
    let Some(snapshot) = current else {
        return Vector::new();
    };

    let mut issues: Vec<IssueCount> = snapshot
        .per_item_error_counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(item, count)| IssueCount {
            item: *item,
            count: *count,
        })
        .collect();
    // Descending by count; the map iterates in id order, so a stable sort
    // leaves ties on the lowest id.
    issues.sort_by(|a, b| b.count.cmp(&a.count));
    issues.into_iter().collect()
}

fn build_center_comparison(
    records: &[EvaluationRecord],
    range: &DateRange,
) -> Vector<CenterComparison> {
    let period = Period::new(range.start, range.end);
    aggregation::aggregate_range(records, &GroupDimensions::by_center(), range)
        .into_iter()
        .map(|snapshot| {
            let center = snapshot.group.center.clone().unwrap_or_default();
            let center_records: Vec<EvaluationRecord> = records
                .iter()
                .filter(|r| r.center == center)
                .cloned()
                .collect();
            CenterComparison {
                agent_count: aggregation::aggregate_agents(&center_records, period).len(),
                center,
                error_rate: snapshot.overall_error_rate,
                total_evaluations: snapshot.total_evaluations,
            }
        })
        .collect()
}

fn build_daily_trend(
    records: &[EvaluationRecord],
    targets: &[Target],
    range: &DateRange,
    group: &GroupKey,
) -> Vec<DailyTrendPoint> {
    aggregation::aggregate(records, &GroupDimensions::none(), Granularity::Day, range)
        .into_iter()
        .map(|snapshot| DailyTrendPoint {
            date: snapshot.period.start,
            overall_rate: snapshot.overall_error_rate,
            total_evaluations: snapshot.total_evaluations,
            target_rate: achievement::resolve_target_rate(
                targets,
                group,
                &snapshot.period,
                RateKind::Overall,
            ),
        })
        .collect()
}

fn build_group_ranking(records: &[EvaluationRecord], range: &DateRange) -> Vector<GroupRank> {
    let dims = GroupDimensions {
        center: true,
        service: true,
        channel: true,
        tenure: false,
    };
    let mut ranking: Vec<GroupRank> = aggregation::aggregate_range(records, &dims, range)
        .into_iter()
        .map(|snapshot| GroupRank {
            group: snapshot.group.clone(),
            error_rate: snapshot.overall_error_rate,
            total_evaluations: snapshot.total_evaluations,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.error_rate
            .partial_cmp(&a.error_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.group.cmp(&b.group))
    });
    ranking.into_iter().collect()
}
