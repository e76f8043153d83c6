use criterion::{black_box, criterion_group, criterion_main, Criterion};

use billr::domain::TimeEntry;
use billr::rules::{
    BlockBillingRule, ComplianceRule, DailyHoursCapRule, DescriptionLengthRule, RuleSet,
    TravelTimeRule, VaguePhraseRule,
};

fn create_test_batch(size: usize) -> Vec<TimeEntry> {
    let narratives = [
        "Draft motion to compel further responses to interrogatories",
        "work on it",
        "Travel to Oakland for deposition of R. Alvarez",
        "Review and analyze opposition brief; outline reply arguments",
        "Telephone conference with client re settlement posture",
    ];

    (0..size)
        .map(|i| {
            let mut entry = TimeEntry::new(narratives[i % narratives.len()], 1.5);
            entry.work_date = Some(
                format!("2025-08-{:02}", (i % 28) + 1)
                    .parse()
                    .expect("valid date"),
            );
            entry
        })
        .collect()
}

fn bench_description_length(c: &mut Criterion) {
    let rule = DescriptionLengthRule::default();
    let entries = create_test_batch(1000);

    c.bench_function("description_length_1000_entries", |b| {
        b.iter(|| rule.apply(black_box(&entries)))
    });
}

fn bench_vague_phrase(c: &mut Criterion) {
    let rule = VaguePhraseRule::default();
    let entries = create_test_batch(1000);

    c.bench_function("vague_phrase_1000_entries", |b| {
        b.iter(|| rule.apply(black_box(&entries)))
    });
}

fn bench_block_billing(c: &mut Criterion) {
    let rule = BlockBillingRule::new();
    let entries = create_test_batch(1000);

    c.bench_function("block_billing_1000_entries", |b| {
        b.iter(|| rule.apply(black_box(&entries)))
    });
}

fn bench_daily_hours_cap(c: &mut Criterion) {
    let rule = DailyHoursCapRule::default();
    let entries = create_test_batch(1000);

    c.bench_function("daily_hours_cap_1000_entries", |b| {
        b.iter(|| rule.apply(black_box(&entries)))
    });
}

fn bench_travel_time(c: &mut Criterion) {
    let rule = TravelTimeRule::default();
    let entries = create_test_batch(1000);

    c.bench_function("travel_time_1000_entries", |b| {
        b.iter(|| rule.apply(black_box(&entries)))
    });
}

fn bench_default_set(c: &mut Criterion) {
    let ruleset = RuleSet::default_set();
    let entries = create_test_batch(1000);

    c.bench_function("default_ruleset_1000_entries", |b| {
        b.iter(|| ruleset.run(black_box(&entries)))
    });
}

criterion_group!(
    benches,
    bench_description_length,
    bench_vague_phrase,
    bench_block_billing,
    bench_daily_hours_cap,
    bench_travel_time,
    bench_default_set
);
criterion_main!(benches);
