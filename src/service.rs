//! Fetch-then-aggregate orchestration over an [`EvaluationStore`].
//!
//! The engine proper only sees materialized data; this layer is where store
//! failures surface and where partial fetches are flagged instead of being
//! passed off as complete.

use crate::aggregation::GroupDimensions;
use crate::core::{Granularity, MetricSnapshot, Prediction};
use crate::engine::QcEngine;
use crate::errors::EngineError;
use crate::filters::{DateRange, GroupFilter};
use crate::store::EvaluationStore;
use serde::{Deserialize, Serialize};

/// Snapshots annotated with the provenance of the records behind them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SourcedSnapshots {
    pub snapshots: Vec<MetricSnapshot>,
    /// The range the store actually served; narrower than the request when
    /// the fetch was partial.
    pub source_range: DateRange,
    pub complete: bool,
}

pub struct MetricsService<'a, S: EvaluationStore> {
    engine: &'a QcEngine,
    store: &'a S,
}

impl<'a, S: EvaluationStore> MetricsService<'a, S> {
    pub fn new(engine: &'a QcEngine, store: &'a S) -> Self {
        Self { engine, store }
    }

    /// Fetch and aggregate. The filter is validated before the store is
    /// touched; a partial fetch aggregates only what arrived and says so.
    pub fn snapshots(
        &self,
        filter: &GroupFilter,
        dims: &GroupDimensions,
        granularity: Granularity,
        range: &DateRange,
    ) -> Result<SourcedSnapshots, EngineError> {
        self.engine.validate_query(filter, range)?;

        let fetched = self.store.fetch_evaluations(filter, range)?;
        if !fetched.complete {
            log::warn!(
                "store served {} instead of requested {range}; flagging result partial",
                fetched.covered
            );
        }

        let snapshots =
            self.engine
                .aggregate(&fetched.items, dims, granularity, &fetched.covered)?;
        Ok(SourcedSnapshots {
            snapshots,
            source_range: fetched.covered,
            complete: fetched.complete,
        })
    }

    /// Fetch one group's history and predict it. `None` when the range
    /// holds no usable snapshots for the filtered group.
    pub fn predict(
        &self,
        filter: &GroupFilter,
        dims: &GroupDimensions,
        granularity: Granularity,
        range: &DateRange,
    ) -> Result<Option<Prediction>, EngineError> {
        let sourced = self.snapshots(filter, dims, granularity, range)?;
        let targets = self.store.fetch_targets(filter, range)?;
        Ok(self.engine.predict(&sourced.snapshots, &targets.items))
    }
}
