//! Calendar alignment of periods. Weeks are ISO weeks (Monday through
//! Sunday); months run from the 1st to the last calendar day.

use crate::core::{Granularity, Period};
use crate::filters::DateRange;
use chrono::{Datelike, Duration, NaiveDate};

/// The aligned period containing `date`.
pub fn period_containing(date: NaiveDate, granularity: Granularity) -> Period {
    match granularity {
        Granularity::Day => Period::new(date, date),
        Granularity::Week => {
            let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            Period::new(start, start + Duration::days(6))
        }
        Granularity::Month => {
            let start = first_of_month(date);
            Period::new(start, first_of_next_month(date) - Duration::days(1))
        }
    }
}

/// The period immediately after `period` at the same granularity.
pub fn next_period(period: &Period, granularity: Granularity) -> Period {
    period_containing(period.end + Duration::days(1), granularity)
}

/// All aligned periods overlapping `range`, ascending. The first and last
/// period may overhang the range edges; records are filtered to the range
/// before bucketing, so overhang never pulls in out-of-range calls.
pub fn periods_in_range(range: &DateRange, granularity: Granularity) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut current = period_containing(range.start, granularity);
    while current.start <= range.end {
        periods.push(current);
        current = next_period(&current, granularity);
    }
    periods
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap_or(date)
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
