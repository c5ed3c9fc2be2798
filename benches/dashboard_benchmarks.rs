//! Benchmarks for the dashboard feed and the live telemetry simulator

use ambient_core::Catalog;
use ambient_core::config::TelemetryConfig;
use ambient_dashboard::feed::{FeedBuckets, feed_cards};
use ambient_dashboard::simulator::MetricSimulator;
use chrono::NaiveDate;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Benchmark bucket classification over a large fleet
fn bench_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("feed");
    let seed = Catalog::seed();
    let fleet: Vec<_> = seed.systems.iter().cycle().take(3_000).cloned().collect();
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default();

    group.throughput(Throughput::Elements(fleet.len() as u64));
    group.bench_function("buckets", |b| {
        b.iter(|| FeedBuckets::from_systems(black_box(&fleet)).len());
    });
    group.bench_function("cards", |b| {
        b.iter(|| feed_cards(black_box(&fleet), today).len());
    });
    group.finish();
}

/// Benchmark simulator steps on the heating-power metric
fn bench_simulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator");
    let settings = TelemetryConfig::default();
    let thresholds = ambient_core::MetricThresholds::default().heating_power;
    let catalog = Catalog::seed();
    let Some(system) = catalog.system("sys_001") else {
        return;
    };

    group.bench_function("step", |b| {
        let mut simulator = MetricSimulator::seeded(7, &settings, Some(thresholds));
        let mut metric = system.metrics.heating_power.clone();
        b.iter(|| simulator.step(black_box(&mut metric)));
    });
    group.bench_function("next_value", |b| {
        let mut simulator = MetricSimulator::seeded(7, &settings, Some(thresholds));
        b.iter(|| simulator.next_value(black_box(50.0)));
    });
    group.finish();
}

criterion_group!(benches, bench_feed, bench_simulator);
criterion_main!(benches);
