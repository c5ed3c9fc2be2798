//! Test fixtures

use ambient_core::config::TelemetryConfig;
use ambient_core::{Catalog, HvacSystem, MetricThresholds};
use ambient_dashboard::PanelOptions;
use ambient_forecast::{ForecastService, MockForecastService};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// Tick period used by the fixtures
pub const TICK: Duration = Duration::from_millis(2_500);

/// Fixed reference date
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default()
}

/// A seed system by id
pub fn seed_system(id: &str) -> HvacSystem {
    Catalog::seed()
        .system(id)
        .cloned()
        .unwrap_or_else(|| panic!("seed system {id} missing"))
}

/// Telemetry settings with a fixed seed
pub fn seeded_telemetry(seed: u64) -> TelemetryConfig {
    TelemetryConfig {
        tick_interval_ms: 2_500,
        jitter_bound: 2.0,
        trend_flip_probability: 0.1,
        seed: Some(seed),
    }
}

/// Panel options without a forecast backend
pub fn live_only(seed: u64) -> PanelOptions {
    PanelOptions {
        telemetry: seeded_telemetry(seed),
        thresholds: MetricThresholds::default(),
        forecast: None,
    }
}

/// Panel options backed by `service`
pub fn with_forecast(seed: u64, service: &Arc<MockForecastService>) -> PanelOptions {
    PanelOptions {
        forecast: Some(Arc::clone(service) as Arc<dyn ForecastService>),
        ..live_only(seed)
    }
}
