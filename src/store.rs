//! Data-store collaborator boundary.
//!
//! The engine never holds a live connection; callers implement
//! [`EvaluationStore`] over whatever backend they have and hand the fetched
//! data in. A fetch reports the range it actually covered so a partial
//! result is never silently treated as complete.

use crate::core::{EvaluationRecord, Target};
use crate::errors::EngineError;
use crate::filters::{DateRange, GroupFilter};
use serde::{Deserialize, Serialize};

/// Result of one store fetch: the items plus coverage metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FetchOutcome<T> {
    pub items: Vec<T>,
    /// The sub-range the store actually served.
    pub covered: DateRange,
    /// False when `covered` is narrower than the requested range.
    pub complete: bool,
}

impl<T> FetchOutcome<T> {
    pub fn complete(items: Vec<T>, covered: DateRange) -> Self {
        Self {
            items,
            covered,
            complete: true,
        }
    }

    pub fn partial(items: Vec<T>, covered: DateRange) -> Self {
        Self {
            items,
            covered,
            complete: false,
        }
    }
}

/// Read-only record store the engine's callers fetch from. Failures are
/// surfaced as retryable [`EngineError::Upstream`] errors.
pub trait EvaluationStore {
    fn fetch_evaluations(
        &self,
        filter: &GroupFilter,
        range: &DateRange,
    ) -> Result<FetchOutcome<EvaluationRecord>, EngineError>;

    fn fetch_targets(
        &self,
        filter: &GroupFilter,
        range: &DateRange,
    ) -> Result<FetchOutcome<Target>, EngineError>;
}

/// In-memory store backed by plain vectors. The reference implementation
/// for tests and small deployments.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    pub records: Vec<EvaluationRecord>,
    pub targets: Vec<Target>,
}

impl InMemoryStore {
    pub fn new(records: Vec<EvaluationRecord>, targets: Vec<Target>) -> Self {
        Self { records, targets }
    }
}

impl EvaluationStore for InMemoryStore {
    fn fetch_evaluations(
        &self,
        filter: &GroupFilter,
        range: &DateRange,
    ) -> Result<FetchOutcome<EvaluationRecord>, EngineError> {
        let items = self
            .records
            .iter()
            .filter(|r| range.contains(r.date) && filter.matches(r))
            .cloned()
            .collect();
        Ok(FetchOutcome::complete(items, *range))
    }

    fn fetch_targets(
        &self,
        _filter: &GroupFilter,
        range: &DateRange,
    ) -> Result<FetchOutcome<Target>, EngineError> {
        let items = self
            .targets
            .iter()
            .filter(|t| t.period_start <= range.end && t.period_end >= range.start)
            .cloned()
            .collect();
        Ok(FetchOutcome::complete(items, *range))
    }
}
