// Export modules for library usage
pub mod achievement;
pub mod aggregation;
pub mod cache;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod filters;
pub mod forecast;
pub mod report;
pub mod risk;
pub mod service;
pub mod store;
pub mod trend;
pub mod watchlist;

// Re-export commonly used types
pub use crate::core::{
    AgentSnapshot, ErrorCategory, ErrorItem, EvaluationRecord, Granularity, GroupKey,
    MetricSnapshot, Period, Prediction, RateKind, RiskLevel, SeriesPrediction, Target,
    TenureGroup, TrendDirection, WatchEntry,
};

pub use crate::aggregation::{aggregate, aggregate_agents, aggregate_range, GroupDimensions};
pub use crate::config::EngineConfig;
pub use crate::engine::QcEngine;
pub use crate::errors::EngineError;
pub use crate::filters::{DateRange, GroupFilter};
pub use crate::forecast::{forecast, Forecast};
pub use crate::report::{compose_report, ReportDocument, ReportType};
pub use crate::risk::{risk_level, ColorBand};
pub use crate::service::{MetricsService, SourcedSnapshots};
pub use crate::store::{EvaluationStore, FetchOutcome, InMemoryStore};
pub use crate::trend::{analyze, TrendAnalysis};
pub use crate::watchlist::build_watchlist;
