pub mod stats;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The two evaluation-sheet categories an error item belongs to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Attitude,
    Operations,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Attitude => write!(f, "Attitude"),
            ErrorCategory::Operations => write!(f, "Operations"),
        }
    }
}

/// The fixed set of per-call evaluation items: 5 attitude items followed by
/// 11 operations items. Declaration order defines the stable item id used
/// for tie-breaking and report ordering.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorItem {
    // Attitude
    Greeting,
    WordChoice,
    Listening,
    Empathy,
    Closing,
    // Operations
    IdentityCheck,
    RequiredDisclosure,
    ProcedureOrder,
    SystemEntry,
    ProductExplanation,
    HoldHandling,
    TransferHandling,
    CallbackPromise,
    RecordKeeping,
    SecurityHandling,
    FollowUp,
}

impl ErrorItem {
    pub const ALL: [ErrorItem; 16] = [
        ErrorItem::Greeting,
        ErrorItem::WordChoice,
        ErrorItem::Listening,
        ErrorItem::Empathy,
        ErrorItem::Closing,
        ErrorItem::IdentityCheck,
        ErrorItem::RequiredDisclosure,
        ErrorItem::ProcedureOrder,
        ErrorItem::SystemEntry,
        ErrorItem::ProductExplanation,
        ErrorItem::HoldHandling,
        ErrorItem::TransferHandling,
        ErrorItem::CallbackPromise,
        ErrorItem::RecordKeeping,
        ErrorItem::SecurityHandling,
        ErrorItem::FollowUp,
    ];

    /// Stable numeric id (position in `ALL`).
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn category(self) -> ErrorCategory {
        if (self as u8) < 5 {
            ErrorCategory::Attitude
        } else {
            ErrorCategory::Operations
        }
    }

    pub fn label(self) -> &'static str {
        static LABELS: &[(ErrorItem, &str)] = &[
            (ErrorItem::Greeting, "Greeting"),
            (ErrorItem::WordChoice, "Word Choice"),
            (ErrorItem::Listening, "Listening"),
            (ErrorItem::Empathy, "Empathy"),
            (ErrorItem::Closing, "Closing"),
            (ErrorItem::IdentityCheck, "Identity Check"),
            (ErrorItem::RequiredDisclosure, "Required Disclosure"),
            (ErrorItem::ProcedureOrder, "Procedure Order"),
            (ErrorItem::SystemEntry, "System Entry"),
            (ErrorItem::ProductExplanation, "Product Explanation"),
            (ErrorItem::HoldHandling, "Hold Handling"),
            (ErrorItem::TransferHandling, "Transfer Handling"),
            (ErrorItem::CallbackPromise, "Callback Promise"),
            (ErrorItem::RecordKeeping, "Record Keeping"),
            (ErrorItem::SecurityHandling, "Security Handling"),
            (ErrorItem::FollowUp, "Follow Up"),
        ];

        LABELS
            .iter()
            .find(|(item, _)| item == &self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown")
    }
}

impl std::fmt::Display for ErrorItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The three rate series tracked for every group: the two sheet categories
/// plus the union of both.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RateKind {
    Attitude,
    Operations,
    Overall,
}

impl RateKind {
    pub const ALL: [RateKind; 3] = [RateKind::Attitude, RateKind::Operations, RateKind::Overall];
}

impl std::fmt::Display for RateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RateKind::Attitude => "attitude",
            RateKind::Operations => "operations",
            RateKind::Overall => "overall",
        };
        write!(f, "{s}")
    }
}

/// One evaluated call, already normalized at the ingestion boundary.
/// `errors` holds the items flagged on the call; an item absent from the
/// list counts as no error, which is how malformed flags were resolved
/// upstream.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRecord {
    pub date: NaiveDate,
    pub agent_id: String,
    pub center: String,
    pub service: String,
    pub channel: String,
    pub tenure_months: u32,
    pub errors: Vec<ErrorItem>,
}

impl EvaluationRecord {
    pub fn has_item(&self, item: ErrorItem) -> bool {
        self.errors.contains(&item)
    }

    pub fn has_category_error(&self, category: ErrorCategory) -> bool {
        self.errors.iter().any(|e| e.category() == category)
    }

    pub fn has_any_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Tenure bucket derived from `tenure_months`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TenureGroup {
    UnderThree,
    ThreeToFive,
    SixToEleven,
    TwelvePlus,
}

impl TenureGroup {
    pub fn from_months(months: u32) -> Self {
        match months {
            0..=2 => TenureGroup::UnderThree,
            3..=5 => TenureGroup::ThreeToFive,
            6..=11 => TenureGroup::SixToEleven,
            _ => TenureGroup::TwelvePlus,
        }
    }
}

impl std::fmt::Display for TenureGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(TenureGroup, &str)] = &[
            (TenureGroup::UnderThree, "0-2mo"),
            (TenureGroup::ThreeToFive, "3-5mo"),
            (TenureGroup::SixToEleven, "6-11mo"),
            (TenureGroup::TwelvePlus, "12mo+"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(g, _)| g == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Grouping tuple metrics are computed against. Only the dimensions selected
/// for a query are populated; two records fall in the same group iff every
/// populated dimension matches exactly.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GroupKey {
    pub center: Option<String>,
    pub service: Option<String>,
    pub channel: Option<String>,
    pub tenure_group: Option<TenureGroup>,
}

impl GroupKey {
    /// The key with no dimensions populated: one group covering everything.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn is_global(&self) -> bool {
        self.center.is_none()
            && self.service.is_none()
            && self.channel.is_none()
            && self.tenure_group.is_none()
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_global() {
            return write!(f, "all");
        }
        let mut parts: Vec<String> = Vec::new();
        if let Some(c) = &self.center {
            parts.push(c.clone());
        }
        if let Some(s) = &self.service {
            parts.push(s.clone());
        }
        if let Some(ch) = &self.channel {
            parts.push(ch.clone());
        }
        if let Some(t) = &self.tenure_group {
            parts.push(t.to_string());
        }
        write!(f, "{}", parts.join("/"))
    }
}

/// Period granularity snapshots are aligned to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        };
        write!(f, "{s}")
    }
}

/// One aligned time bucket, inclusive on both ends.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Derived error-rate aggregate for one group and period. Rates are
/// percentages in [0, 100]; a bucket with no evaluations is `empty` with all
/// rates zero so downstream stages can exclude it without dividing by zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricSnapshot {
    pub group: GroupKey,
    pub period: Period,
    pub total_evaluations: u32,
    pub attitude_error_rate: f64,
    pub ops_error_rate: f64,
    pub overall_error_rate: f64,
    pub per_item_error_counts: BTreeMap<ErrorItem, u32>,
    pub empty: bool,
}

impl MetricSnapshot {
    pub fn empty(group: GroupKey, period: Period) -> Self {
        Self {
            group,
            period,
            total_evaluations: 0,
            attitude_error_rate: 0.0,
            ops_error_rate: 0.0,
            overall_error_rate: 0.0,
            per_item_error_counts: BTreeMap::new(),
            empty: true,
        }
    }

    pub fn rate(&self, kind: RateKind) -> f64 {
        match kind {
            RateKind::Attitude => self.attitude_error_rate,
            RateKind::Operations => self.ops_error_rate,
            RateKind::Overall => self.overall_error_rate,
        }
    }
}

/// Per-agent aggregate for one period; input to the watchlist selector and
/// the distinct-agent counts in reports.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub period: Period,
    pub total_evaluations: u32,
    pub overall_error_rate: f64,
    pub per_item_error_counts: BTreeMap<ErrorItem, u32>,
}

/// Target error rates for a period, either group-specific or global
/// (`group = None`). Lower is better; a group beats its target when its
/// rate is at or under the target rate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Target {
    pub group: Option<GroupKey>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub attitude_rate: f64,
    pub ops_rate: f64,
    pub overall_rate: f64,
}

impl Target {
    pub fn rate(&self, kind: RateKind) -> f64 {
        match kind {
            RateKind::Attitude => self.attitude_rate,
            RateKind::Operations => self.ops_rate,
            RateKind::Overall => self.overall_rate,
        }
    }

    pub fn encloses(&self, period: &Period) -> bool {
        self.period_start <= period.start && period.end <= self.period_end
    }
}

/// Directional classification of rate change across recent periods.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TrendDirection {
    Improving,
    Stable,
    Worsening,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(TrendDirection, &str)] = &[
            (TrendDirection::Improving, "Improving"),
            (TrendDirection::Stable, "Stable"),
            (TrendDirection::Worsening, "Worsening"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Discrete severity band derived from achievement probability.
/// `Ord` follows severity: `Low < Medium < High < Critical`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(RiskLevel, &str)] = &[
            (RiskLevel::Low, "Low"),
            (RiskLevel::Medium, "Medium"),
            (RiskLevel::High, "High"),
            (RiskLevel::Critical, "Critical"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(r, _)| r == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Forecast block for one rate series of a group.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesPrediction {
    pub current_rate: f64,
    pub predicted_rate: f64,
    pub w4_predicted_rate: f64,
    pub trend: TrendDirection,
    /// None when no target (group-specific or global) applies to the period.
    pub achievement_probability: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub low_confidence: bool,
}

/// Full prediction surface for one group, keyed by its latest period.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub group: GroupKey,
    pub period: Period,
    pub attitude: SeriesPrediction,
    pub operations: SeriesPrediction,
    pub overall: SeriesPrediction,
    /// Most severe of the attitude/operations risk levels.
    pub overall_risk: RiskLevel,
    pub alert_flag: bool,
}

/// One watchlist row: an agent flagged for intervention.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WatchEntry {
    pub agent_id: String,
    pub error_rate: f64,
    /// Current-period rate minus prior-period rate; 0 when no prior data.
    pub trend: f64,
    /// Highest-count error item for the agent in the period, if any error
    /// was flagged at all.
    pub main_issue: Option<ErrorItem>,
}
