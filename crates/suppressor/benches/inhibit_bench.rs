//! 억제 판정 벤치마크
//!
//! 저장된 규칙 수에 따른 `is_inhibited_at` 비용을 측정합니다.

use std::time::{Duration, SystemTime};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use hush_core::event::AlertEvent;
use hush_core::types::{Severity, labels_from};
use hush_suppressor::{FilterSet, Suppression, Suppressor};

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn create_alert() -> AlertEvent {
    AlertEvent::new(
        labels_from([
            ("alertname", "HighLatency"),
            ("severity", "critical"),
            ("instance", "api-07:8080"),
            ("team", "payments"),
        ]),
        "p99 latency above 2s",
        Severity::Critical,
    )
}

// 어떤 이벤트에도 매칭되지 않는 규칙으로 채운 저장소
fn create_store(size: u64) -> Suppressor {
    let store = Suppressor::new();
    for i in 0..size {
        let filters = FilterSet::from_patterns([
            ("team".to_owned(), format!("team-{i}")),
            ("instance".to_owned(), r"db-\d+:9100".to_owned()),
        ])
        .unwrap();
        store.add(Suppression::new(
            "bench",
            at(0),
            at(10_000 + i),
            "",
            filters,
        ));
    }
    store
}

fn bench_no_match_scaling(c: &mut Criterion) {
    let event = create_alert();
    let mut group = c.benchmark_group("inhibit_no_match");
    group.throughput(Throughput::Elements(1));

    for size in [10u64, 100, 1_000] {
        let store = create_store(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| store.is_inhibited_at(black_box(&event), at(5_000)))
        });
    }
    group.finish();
}

fn bench_last_entry_match(c: &mut Criterion) {
    let event = create_alert();
    let mut group = c.benchmark_group("inhibit_last_match");

    for size in [10u64, 100, 1_000] {
        let store = create_store(size);
        store.add(Suppression::new(
            "bench",
            at(0),
            at(1_000_000),
            "",
            FilterSet::from_patterns([("team", "payments"), ("severity", "critical|high")])
                .unwrap(),
        ));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| store.is_inhibited_at(black_box(&event), at(5_000)))
        });
    }
    group.finish();
}

fn bench_reap(c: &mut Criterion) {
    c.bench_function("reap_half_of_1000", |b| {
        b.iter_with_setup(
            || create_store(1_000),
            |store| store.reap(black_box(at(10_500))),
        )
    });
}

criterion_group!(
    benches,
    bench_no_match_scaling,
    bench_last_entry_match,
    bench_reap
);
criterion_main!(benches);
