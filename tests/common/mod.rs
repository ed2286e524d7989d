// Test utility module for qcast integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use qcast::core::{ErrorItem, EvaluationRecord, Target};
use qcast::filters::DateRange;

/// Route `log` output through the test harness. Safe to call from every
/// test; only the first call installs the logger.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end)
}

/// Builder for evaluation records with sensible defaults.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: EvaluationRecord,
}

impl RecordBuilder {
    pub fn new(on: NaiveDate) -> Self {
        Self {
            record: EvaluationRecord {
                date: on,
                agent_id: "A001".to_string(),
                center: "Tokyo".to_string(),
                service: "Mobile".to_string(),
                channel: "Inbound".to_string(),
                tenure_months: 12,
                errors: Vec::new(),
            },
        }
    }

    pub fn agent(mut self, agent_id: &str) -> Self {
        self.record.agent_id = agent_id.to_string();
        self
    }

    pub fn center(mut self, center: &str) -> Self {
        self.record.center = center.to_string();
        self
    }

    pub fn service(mut self, service: &str) -> Self {
        self.record.service = service.to_string();
        self
    }

    pub fn channel(mut self, channel: &str) -> Self {
        self.record.channel = channel.to_string();
        self
    }

    pub fn tenure(mut self, months: u32) -> Self {
        self.record.tenure_months = months;
        self
    }

    pub fn errors(mut self, errors: &[ErrorItem]) -> Self {
        self.record.errors = errors.to_vec();
        self
    }

    pub fn build(self) -> EvaluationRecord {
        self.record
    }
}

pub fn clean_record(on: NaiveDate) -> EvaluationRecord {
    RecordBuilder::new(on).build()
}

pub fn record_with(on: NaiveDate, errors: &[ErrorItem]) -> EvaluationRecord {
    RecordBuilder::new(on).errors(errors).build()
}

/// A global target holding every category to the same rate over a range.
pub fn global_target(start: NaiveDate, end: NaiveDate, rate: f64) -> Target {
    Target {
        group: None,
        period_start: start,
        period_end: end,
        attitude_rate: rate,
        ops_rate: rate,
        overall_rate: rate,
    }
}
