mod common;

use common::{date, RecordBuilder};
use qcast::aggregation::aggregate_agents;
use qcast::core::{ErrorItem, Period};
use qcast::watchlist::build_watchlist;

fn this_week() -> Period {
    Period::new(date(2025, 6, 2), date(2025, 6, 8))
}

fn last_week() -> Period {
    Period::new(date(2025, 5, 26), date(2025, 6, 1))
}

#[test]
fn top_five_of_twenty_distinct_agents_in_descending_order() {
    // Agent i takes i error calls out of 20, so rates are 0%, 5%, ... 95%.
    let mut records = Vec::new();
    for agent in 0..20u32 {
        for call in 0..20u32 {
            let errors: &[ErrorItem] = if call < agent {
                &[ErrorItem::Greeting]
            } else {
                &[]
            };
            records.push(
                RecordBuilder::new(date(2025, 6, 2))
                    .agent(&format!("A{agent:02}"))
                    .errors(errors)
                    .build(),
            );
        }
    }

    let current = aggregate_agents(&records, this_week());
    let watchlist = build_watchlist(&current, &[], 5);

    assert_eq!(watchlist.len(), 5);
    let ids: Vec<_> = watchlist.iter().map(|e| e.agent_id.as_str()).collect();
    assert_eq!(ids, vec!["A19", "A18", "A17", "A16", "A15"]);
    for pair in watchlist.iter().zip(watchlist.iter().skip(1)) {
        assert!(pair.0.error_rate >= pair.1.error_rate);
    }
}

#[test]
fn rate_ties_break_by_agent_id_ascending() {
    let mut records = Vec::new();
    for agent in ["Z", "A", "M"] {
        records.push(
            RecordBuilder::new(date(2025, 6, 2))
                .agent(agent)
                .errors(&[ErrorItem::SystemEntry])
                .build(),
        );
    }

    let current = aggregate_agents(&records, this_week());
    let watchlist = build_watchlist(&current, &[], 3);
    let ids: Vec<_> = watchlist.iter().map(|e| e.agent_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "M", "Z"]);
}

#[test]
fn main_issue_is_highest_count_with_lowest_id_on_ties() {
    let mut records = Vec::new();
    // Two hold-handling errors, one greeting error.
    for errors in [
        &[ErrorItem::HoldHandling][..],
        &[ErrorItem::HoldHandling],
        &[ErrorItem::Greeting],
    ] {
        records.push(
            RecordBuilder::new(date(2025, 6, 2))
                .agent("A001")
                .errors(errors)
                .build(),
        );
    }

    let current = aggregate_agents(&records, this_week());
    let watchlist = build_watchlist(&current, &[], 1);
    assert_eq!(watchlist[0].main_issue, Some(ErrorItem::HoldHandling));

    // Tied counts: Greeting has the lower item id than SystemEntry.
    let tied = vec![
        RecordBuilder::new(date(2025, 6, 2))
            .agent("A002")
            .errors(&[ErrorItem::SystemEntry, ErrorItem::Greeting])
            .build(),
    ];
    let current = aggregate_agents(&tied, this_week());
    let watchlist = build_watchlist(&current, &[], 1);
    assert_eq!(watchlist[0].main_issue, Some(ErrorItem::Greeting));
}

#[test]
fn clean_agent_has_no_main_issue() {
    let records = vec![RecordBuilder::new(date(2025, 6, 2)).agent("A001").build()];
    let current = aggregate_agents(&records, this_week());
    let watchlist = build_watchlist(&current, &[], 1);
    assert_eq!(watchlist[0].main_issue, None);
    assert_eq!(watchlist[0].error_rate, 0.0);
}

#[test]
fn trend_is_delta_against_prior_period() {
    let current_records = vec![
        RecordBuilder::new(date(2025, 6, 2))
            .agent("A001")
            .errors(&[ErrorItem::Greeting])
            .build(),
        RecordBuilder::new(date(2025, 6, 3)).agent("A001").build(),
    ];
    let prior_records = vec![RecordBuilder::new(date(2025, 5, 26)).agent("A001").build()];

    let current = aggregate_agents(&current_records, this_week());
    let prior = aggregate_agents(&prior_records, last_week());
    let watchlist = build_watchlist(&current, &prior, 1);

    // 50% now vs 0% last week.
    assert_eq!(watchlist[0].trend, 50.0);
}

#[test]
fn missing_prior_period_means_zero_trend() {
    let records = vec![
        RecordBuilder::new(date(2025, 6, 2))
            .agent("A001")
            .errors(&[ErrorItem::Greeting])
            .build(),
    ];
    let current = aggregate_agents(&records, this_week());
    let watchlist = build_watchlist(&current, &[], 1);
    assert_eq!(watchlist[0].trend, 0.0);
}

#[test]
fn k_larger_than_agent_count_returns_everyone() {
    let records = vec![
        RecordBuilder::new(date(2025, 6, 2)).agent("A").build(),
        RecordBuilder::new(date(2025, 6, 2)).agent("B").build(),
    ];
    let current = aggregate_agents(&records, this_week());
    assert_eq!(build_watchlist(&current, &[], 10).len(), 2);
}
