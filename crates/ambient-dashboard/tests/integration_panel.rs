//! Integration tests for the detail panel lifecycle
//!
//! All tests run on a paused clock, so sleeping advances time instantly.

#![allow(clippy::panic, clippy::indexing_slicing, clippy::unwrap_used)]

mod common;

use ambient_core::MetricThresholds;
use ambient_dashboard::checklist::Checklist;
use ambient_dashboard::detail::PanelState;
use ambient_dashboard::{DetailPanel, ForecastState, LiveFeed, MetricSimulator, RefreshOutcome};
use ambient_forecast::MockForecastService;
use common::*;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

fn heating(panel: &DetailPanel) -> f64 {
    panel
        .snapshot()
        .system
        .metrics
        .heating_power
        .value
        .as_number()
        .unwrap_or(f64::NAN)
}

#[tokio::test(start_paused = true)]
async fn test_live_ticks_stay_bounded() {
    init_test_logging();
    let (tx, _rx) = mpsc::unbounded_channel();
    let panel = DetailPanel::mount(seed_system("sys_001"), live_only(42), tx);

    let half = seeded_telemetry(42).jitter_bound / 2.0;
    let thresholds = MetricThresholds::default().heating_power;
    let mut previous = heating(&panel);
    sleep(Duration::from_millis(10)).await;
    for tick in 1..=40_u64 {
        sleep(TICK).await;
        let snapshot = panel.snapshot();
        assert_eq!(snapshot.ticks, tick);
        assert!(snapshot.last_synced.is_some());

        let metric = &snapshot.system.metrics.heating_power;
        let value = metric.value.as_number().unwrap_or(f64::NAN);
        assert!((0.0..=100.0).contains(&value), "tick {tick}: {value}");
        assert!((value - previous).abs() <= half + 1e-9, "tick {tick}: {previous} -> {value}");

        assert_eq!(metric.status, thresholds.classify(value));
        previous = value;
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_tick_lands_after_unmount() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut panel = DetailPanel::mount(seed_system("sys_002"), live_only(7), tx);

    sleep(TICK * 2 + Duration::from_millis(10)).await;
    assert_eq!(panel.snapshot().ticks, 2);

    panel.unmount();
    let frozen = panel.snapshot();
    sleep(TICK * 10).await;
    let later = panel.snapshot();

    assert_eq!(later.ticks, frozen.ticks);
    assert_eq!(later.last_synced, frozen.last_synced);
    assert_eq!(later.system, frozen.system);
    assert!(!panel.is_live());
}

#[tokio::test(start_paused = true)]
async fn test_forecast_arriving_after_unmount_is_discarded() {
    let service = Arc::new(MockForecastService::new().with_delay(400));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut panel = DetailPanel::mount(seed_system("sys_001"), with_forecast(1, &service), tx);
    assert_eq!(panel.snapshot().forecast, ForecastState::Loading);

    sleep(Duration::from_millis(100)).await;
    panel.unmount();
    sleep(Duration::from_secs(2)).await;

    assert_eq!(panel.snapshot().forecast, ForecastState::Loading);
    assert_eq!(service.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_while_loading_is_ignored() {
    let service = Arc::new(MockForecastService::new().with_delay(400));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut panel = DetailPanel::mount(seed_system("sys_001"), with_forecast(1, &service), tx);

    assert_eq!(panel.refresh_forecast(), RefreshOutcome::AlreadyInFlight);
    assert_eq!(panel.refresh_forecast(), RefreshOutcome::AlreadyInFlight);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(service.calls(), 1);
    let ForecastState::Ready(forecast) = panel.snapshot().forecast else {
        panic!("forecast should be ready");
    };
    assert_eq!(forecast.maintenance_type, "Heat Exchanger Inspection");

    assert_eq!(panel.refresh_forecast(), RefreshOutcome::Started);
    sleep(Duration::from_millis(500)).await;
    assert_eq!(service.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_remount_replaces_the_live_loop() {
    let service = Arc::new(MockForecastService::new().with_delay(400));
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut panel = DetailPanel::mount(seed_system("sys_001"), with_forecast(3, &service), tx);

    sleep(TICK + Duration::from_millis(10)).await;
    assert_eq!(panel.snapshot().ticks, 1);

    panel.remount(seed_system("sys_003"));
    assert_eq!(panel.system_id(), "sys_003");
    assert_eq!(panel.snapshot().ticks, 0);
    assert!(panel.is_live());

    sleep(TICK + Duration::from_millis(10)).await;
    let snapshot = panel.snapshot();
    assert_eq!(snapshot.ticks, 1);
    assert_eq!(snapshot.system.id, "sys_003");

    let ForecastState::Ready(forecast) = snapshot.forecast else {
        panic!("remount should request a fresh forecast");
    };
    assert_eq!(forecast.maintenance_type, "Routine Tune-Up");
    assert_eq!(service.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_feed_stops_ticking() {
    let state = Arc::new(Mutex::new(PanelState {
        system: seed_system("sys_003"),
        mounted: true,
        generation: 1,
        last_synced: None,
        ticks: 0,
        forecast: ForecastState::Idle,
        checklist: Checklist::default(),
    }));
    let thresholds = MetricThresholds::default().heating_power;
    let simulator = MetricSimulator::seeded(5, &seeded_telemetry(5), Some(thresholds));
    let feed = LiveFeed::start(Arc::clone(&state), simulator, TICK);

    sleep(TICK + Duration::from_millis(10)).await;
    assert_eq!(state.lock().ticks, 1);
    assert!(feed.is_running());

    drop(feed);
    sleep(TICK * 3).await;
    assert_eq!(state.lock().ticks, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_generation_stops_the_feed() {
    let state = Arc::new(Mutex::new(PanelState {
        system: seed_system("sys_001"),
        mounted: true,
        generation: 1,
        last_synced: None,
        ticks: 0,
        forecast: ForecastState::Idle,
        checklist: Checklist::default(),
    }));
    let simulator = MetricSimulator::seeded(5, &seeded_telemetry(5), None);
    let feed = LiveFeed::start(Arc::clone(&state), simulator, TICK);

    state.lock().generation = 2;
    sleep(TICK * 2).await;
    assert_eq!(state.lock().ticks, 0);
    assert!(!feed.is_running());
}
