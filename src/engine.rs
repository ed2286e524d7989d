//! Engine facade: the operations surface layers call.
//!
//! Everything here is a pure function over the supplied data; the engine
//! holds nothing but its configuration.

use crate::achievement;
use crate::aggregation::{self, GroupDimensions};
use crate::config::EngineConfig;
use crate::core::{
    AgentSnapshot, EvaluationRecord, Granularity, MetricSnapshot, Prediction, RateKind,
    SeriesPrediction, Target, WatchEntry,
};
use crate::errors::EngineError;
use crate::filters::{validate_query, DateRange, GroupFilter};
use crate::report::{self, ReportDocument, ReportType};
use crate::risk;
use crate::watchlist;
use crate::{forecast, trend};
use im::Vector;
use rayon::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct QcEngine {
    config: EngineConfig,
}

impl QcEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Aggregate records into per-(group, period) snapshots.
    pub fn aggregate(
        &self,
        records: &[EvaluationRecord],
        dims: &GroupDimensions,
        granularity: Granularity,
        range: &DateRange,
    ) -> Result<Vec<MetricSnapshot>, EngineError> {
        range.validate()?;
        Ok(aggregation::aggregate(records, dims, granularity, range))
    }

    /// Aggregate one chunk per period, in parallel. Chunks are independent
    /// (no shared state), so callers can stream them out as they complete.
    /// Groups absent from a chunk's period produce no snapshot there, unlike
    /// the contiguous series `aggregate` emits.
    pub fn aggregate_chunked(
        &self,
        records: &[EvaluationRecord],
        dims: &GroupDimensions,
        granularity: Granularity,
        range: &DateRange,
    ) -> Result<Vec<Vec<MetricSnapshot>>, EngineError> {
        range.validate()?;
        let periods = aggregation::period::periods_in_range(range, granularity);
        Ok(periods
            .par_iter()
            .map(|period| {
                let chunk_range = DateRange::new(period.start.max(range.start), period.end.min(range.end));
                aggregation::aggregate(records, dims, granularity, &chunk_range)
            })
            .collect())
    }

    /// Per-agent snapshots for one period; watchlist input.
    pub fn aggregate_agents(
        &self,
        records: &[EvaluationRecord],
        period: crate::core::Period,
    ) -> Vec<AgentSnapshot> {
        aggregation::aggregate_agents(records, period)
    }

    /// Full prediction surface for one group's snapshot series. `None` when
    /// the series has no usable (non-empty) snapshots to forecast from.
    pub fn predict(
        &self,
        snapshots: &[MetricSnapshot],
        targets: &[Target],
    ) -> Option<Prediction> {
        let series = aggregation::usable_series(snapshots);
        let latest = series.last()?;
        let group = latest.group.clone();
        let period = latest.period;

        if series.len() < 2 {
            log::debug!("predicting {group} from a single usable snapshot; low confidence");
        }

        let build = |kind: RateKind| -> Option<SeriesPrediction> {
            let rates: Vec<f64> = series.iter().map(|s| s.rate(kind)).collect();
            let fc = forecast::forecast(&rates, &self.config.forecast)?;
            let tr = trend::analyze(&rates, self.config.trend.epsilon, self.config.forecast.window);

            let target_rate =
                achievement::resolve_target_rate(targets, &group, &period, kind);
            // Achievement is scored at the forecast horizon, not the next
            // period: the question is whether the group meets the target by
            // then.
            let probability = target_rate.map(|t| {
                achievement::score(fc.w4_predicted_rate, t, fc.dispersion, &self.config.achievement)
            });

            Some(SeriesPrediction {
                current_rate: *rates.last().unwrap_or(&0.0),
                predicted_rate: fc.predicted_rate,
                w4_predicted_rate: fc.w4_predicted_rate,
                trend: tr.direction,
                achievement_probability: probability,
                risk_level: probability.map(risk::risk_level),
                low_confidence: fc.low_confidence || tr.low_confidence,
            })
        };

        let attitude = build(RateKind::Attitude)?;
        let operations = build(RateKind::Operations)?;
        let overall = build(RateKind::Overall)?;

        let overall_risk = risk::overall_risk(attitude.risk_level, operations.risk_level);
        Some(Prediction {
            group,
            period,
            alert_flag: risk::alert_flag(overall_risk),
            overall_risk,
            attitude,
            operations,
            overall,
        })
    }

    /// Ranked watchlist; `k = None` uses the configured default size.
    pub fn build_watchlist(
        &self,
        current: &[AgentSnapshot],
        prior: &[AgentSnapshot],
        k: Option<usize>,
    ) -> Vector<WatchEntry> {
        let k = k.unwrap_or(self.config.watchlist.default_size);
        watchlist::build_watchlist(current, prior, k)
    }

    /// Compose a report over an explicit range.
    pub fn compose_report(
        &self,
        records: &[EvaluationRecord],
        targets: &[Target],
        report_type: ReportType,
        range: DateRange,
        filter: &GroupFilter,
    ) -> Result<ReportDocument, EngineError> {
        report::compose_report(
            records,
            targets,
            report_type,
            range,
            filter,
            self.config.trend.epsilon,
        )
    }

    /// Compose a report whose range is derived from the report type and an
    /// anchor date. `Custom` reports must use [`compose_report`].
    pub fn compose_report_for(
        &self,
        records: &[EvaluationRecord],
        targets: &[Target],
        report_type: ReportType,
        anchor: chrono::NaiveDate,
        filter: &GroupFilter,
    ) -> Result<ReportDocument, EngineError> {
        let range = report_type.derive_range(anchor).ok_or_else(|| {
            EngineError::invalid_filter("custom reports require an explicit date range")
        })?;
        self.compose_report(records, targets, report_type, range, filter)
    }

    pub fn validate_query(
        &self,
        filter: &GroupFilter,
        range: &DateRange,
    ) -> Result<(), EngineError> {
        validate_query(filter, range)
    }
}
