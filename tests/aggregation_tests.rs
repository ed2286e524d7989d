mod common;

use common::{clean_record, date, range, record_with, RecordBuilder};
use pretty_assertions::assert_eq;
use qcast::aggregation::{aggregate, aggregate_agents, aggregate_range, GroupDimensions};
use qcast::core::{ErrorItem, Granularity, Period};

#[test]
fn category_rates_count_calls_not_item_flags() {
    // 100 evaluations: 5 attitude-only, 6 ops-only, 1 with both, 88 clean.
    let day = date(2025, 6, 2);
    let mut records = Vec::new();
    for _ in 0..5 {
        records.push(record_with(day, &[ErrorItem::Greeting]));
    }
    for _ in 0..6 {
        records.push(record_with(day, &[ErrorItem::SystemEntry]));
    }
    records.push(record_with(day, &[ErrorItem::Empathy, ErrorItem::HoldHandling]));
    for _ in 0..88 {
        records.push(clean_record(day));
    }

    let snapshots = aggregate(
        &records,
        &GroupDimensions::none(),
        Granularity::Day,
        &range(day, day),
    );

    assert_eq!(snapshots.len(), 1);
    let s = &snapshots[0];
    assert_eq!(s.total_evaluations, 100);
    assert_eq!(s.attitude_error_rate, 6.0);
    assert_eq!(s.ops_error_rate, 7.0);
    // 12 error calls, not 13: the call with both categories counts once.
    assert_eq!(s.overall_error_rate, 12.0);
}

#[test]
fn multiple_flags_in_one_category_count_one_call() {
    let day = date(2025, 6, 2);
    let records = vec![
        record_with(day, &[ErrorItem::Greeting, ErrorItem::WordChoice, ErrorItem::Empathy]),
        clean_record(day),
    ];

    let snapshots = aggregate(
        &records,
        &GroupDimensions::none(),
        Granularity::Day,
        &range(day, day),
    );

    let s = &snapshots[0];
    assert_eq!(s.attitude_error_rate, 50.0);
    // Item counts still track each flag individually.
    assert_eq!(s.per_item_error_counts[&ErrorItem::Greeting], 1);
    assert_eq!(s.per_item_error_counts[&ErrorItem::WordChoice], 1);
}

#[test]
fn empty_bucket_yields_zeroed_empty_snapshot() {
    let records = vec![clean_record(date(2025, 6, 2))];
    // Range covers two days; the second has no records.
    let snapshots = aggregate(
        &records,
        &GroupDimensions::none(),
        Granularity::Day,
        &range(date(2025, 6, 2), date(2025, 6, 3)),
    );

    assert_eq!(snapshots.len(), 2);
    let empty = &snapshots[1];
    assert!(empty.empty);
    assert_eq!(empty.total_evaluations, 0);
    assert_eq!(empty.overall_error_rate, 0.0);
    assert_eq!(empty.attitude_error_rate, 0.0);
    assert_eq!(empty.ops_error_rate, 0.0);
}

#[test]
fn overall_rate_never_exceeds_category_sum() {
    let day = date(2025, 6, 2);
    let records = vec![
        record_with(day, &[ErrorItem::Greeting, ErrorItem::SystemEntry]),
        record_with(day, &[ErrorItem::Listening]),
        record_with(day, &[ErrorItem::RecordKeeping]),
        clean_record(day),
    ];

    let snapshots = aggregate(
        &records,
        &GroupDimensions::none(),
        Granularity::Day,
        &range(day, day),
    );
    let s = &snapshots[0];
    assert!(s.overall_error_rate <= s.attitude_error_rate + s.ops_error_rate);
}

#[test]
fn per_item_counts_bounded_by_total() {
    let day = date(2025, 6, 2);
    let records: Vec<_> = (0..7)
        .map(|_| record_with(day, &[ErrorItem::Closing]))
        .collect();

    let snapshots = aggregate(
        &records,
        &GroupDimensions::none(),
        Granularity::Day,
        &range(day, day),
    );
    let s = &snapshots[0];
    for count in s.per_item_error_counts.values() {
        assert!(*count <= s.total_evaluations);
    }
}

#[test]
fn recomputation_is_bit_identical() {
    let mut records = Vec::new();
    for d in 2..=13 {
        records.push(record_with(date(2025, 6, d), &[ErrorItem::WordChoice]));
        records.push(clean_record(date(2025, 6, d)));
    }

    let dims = GroupDimensions {
        center: true,
        service: true,
        channel: false,
        tenure: false,
    };
    let r = range(date(2025, 6, 2), date(2025, 6, 15));
    let first = aggregate(&records, &dims, Granularity::Week, &r);
    let second = aggregate(&records, &dims, Granularity::Week, &r);
    assert_eq!(first, second);
}

#[test]
fn snapshots_are_ordered_by_period_ascending() {
    let mut records = Vec::new();
    // Insert out of chronological order on purpose.
    records.push(clean_record(date(2025, 6, 20)));
    records.push(clean_record(date(2025, 6, 2)));
    records.push(clean_record(date(2025, 6, 11)));

    let snapshots = aggregate(
        &records,
        &GroupDimensions::none(),
        Granularity::Week,
        &range(date(2025, 6, 2), date(2025, 6, 22)),
    );

    let starts: Vec<_> = snapshots.iter().map(|s| s.period.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn grouping_by_center_separates_records() {
    let day = date(2025, 6, 2);
    let records = vec![
        RecordBuilder::new(day)
            .center("Tokyo")
            .errors(&[ErrorItem::Greeting])
            .build(),
        RecordBuilder::new(day).center("Osaka").build(),
    ];

    let snapshots = aggregate(
        &records,
        &GroupDimensions::by_center(),
        Granularity::Day,
        &range(day, day),
    );

    assert_eq!(snapshots.len(), 2);
    let osaka = snapshots
        .iter()
        .find(|s| s.group.center.as_deref() == Some("Osaka"))
        .unwrap();
    let tokyo = snapshots
        .iter()
        .find(|s| s.group.center.as_deref() == Some("Tokyo"))
        .unwrap();
    assert_eq!(osaka.overall_error_rate, 0.0);
    assert_eq!(tokyo.overall_error_rate, 100.0);
}

#[test]
fn tenure_dimension_buckets_months() {
    let day = date(2025, 6, 2);
    let records = vec![
        RecordBuilder::new(day).tenure(1).build(),
        RecordBuilder::new(day).tenure(4).build(),
        RecordBuilder::new(day).tenure(24).build(),
    ];

    let dims = GroupDimensions {
        tenure: true,
        ..GroupDimensions::none()
    };
    let snapshots = aggregate(&records, &dims, Granularity::Day, &range(day, day));
    assert_eq!(snapshots.len(), 3);
}

#[test]
fn records_outside_range_are_ignored() {
    let records = vec![
        clean_record(date(2025, 6, 2)),
        clean_record(date(2025, 7, 1)),
    ];

    let snapshots = aggregate(
        &records,
        &GroupDimensions::none(),
        Granularity::Day,
        &range(date(2025, 6, 1), date(2025, 6, 30)),
    );
    let total: u32 = snapshots.iter().map(|s| s.total_evaluations).sum();
    assert_eq!(total, 1);
}

#[test]
fn range_aggregation_collapses_periods() {
    let records = vec![
        record_with(date(2025, 6, 2), &[ErrorItem::Greeting]),
        clean_record(date(2025, 6, 20)),
    ];

    let snapshots = aggregate_range(
        &records,
        &GroupDimensions::none(),
        &range(date(2025, 6, 1), date(2025, 6, 30)),
    );
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].total_evaluations, 2);
    assert_eq!(snapshots[0].overall_error_rate, 50.0);
}

#[test]
fn agent_aggregation_is_sorted_and_scoped_to_period() {
    let day = date(2025, 6, 2);
    let period = Period::new(day, day);
    let records = vec![
        RecordBuilder::new(day).agent("B").errors(&[ErrorItem::Greeting]).build(),
        RecordBuilder::new(day).agent("A").build(),
        RecordBuilder::new(date(2025, 6, 3)).agent("C").build(),
    ];

    let agents = aggregate_agents(&records, period);
    let ids: Vec<_> = agents.iter().map(|a| a.agent_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert_eq!(agents[1].overall_error_rate, 100.0);
}
