//! Query filters and their validation.
//!
//! Filter validation is the fail-fast boundary: a malformed filter is a
//! caller error and must be rejected before the data store is touched.

use crate::core::{EvaluationRecord, GroupKey};
use crate::errors::EngineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The immediately preceding range of equal length.
    pub fn preceding(&self) -> Self {
        let span = self.end - self.start;
        let end = self.start - chrono::Duration::days(1);
        Self {
            start: end - span,
            end,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.start > self.end {
            return Err(EngineError::invalid_filter(format!(
                "date range start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Restricts which records a query sees. All populated dimensions must match
/// exactly; an unpopulated dimension matches everything.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GroupFilter {
    pub center: Option<String>,
    pub service: Option<String>,
    pub channel: Option<String>,
    pub agent_id: Option<String>,
}

impl GroupFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// The group key a query scoped by this filter describes, for target
    /// resolution. Agent scoping has no group dimension and does not
    /// contribute; an unscoped filter yields the global key.
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            center: self.center.clone(),
            service: self.service.clone(),
            channel: self.channel.clone(),
            tenure_group: None,
        }
    }

    pub fn matches(&self, record: &EvaluationRecord) -> bool {
        dimension_matches(&self.center, &record.center)
            && dimension_matches(&self.service, &record.service)
            && dimension_matches(&self.channel, &record.channel)
            && dimension_matches(&self.agent_id, &record.agent_id)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for validation in self.collect_dimension_validations() {
            validation?;
        }
        Ok(())
    }

    fn collect_dimension_validations(&self) -> Vec<Result<(), EngineError>> {
        vec![
            Self::validate_dimension(&self.center, "center"),
            Self::validate_dimension(&self.service, "service"),
            Self::validate_dimension(&self.channel, "channel"),
            Self::validate_dimension(&self.agent_id, "agent_id"),
        ]
    }

    fn validate_dimension(value: &Option<String>, name: &str) -> Result<(), EngineError> {
        match value {
            Some(v) if v.trim().is_empty() => Err(EngineError::invalid_filter(format!(
                "{name} filter must not be blank"
            ))),
            _ => Ok(()),
        }
    }
}

fn dimension_matches(filter: &Option<String>, value: &str) -> bool {
    match filter {
        Some(wanted) => wanted == value,
        None => true,
    }
}

/// Validate a full query shape before any store access.
pub fn validate_query(filter: &GroupFilter, range: &DateRange) -> Result<(), EngineError> {
    filter.validate()?;
    range.validate()
}
