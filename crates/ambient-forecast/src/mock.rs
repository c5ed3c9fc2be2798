//! Mock forecast service for testing and offline runs

use crate::error::{ForecastError, ForecastResult};
use crate::service::ForecastService;
use crate::types::{Forecast, ForecastRequest};
use ambient_core::HealthStatus;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{Duration, sleep};
use tracing::debug;

/// Mock forecast service
///
/// Answers from the heating reading in the request, after an optional delay.
#[derive(Debug, Default)]
pub struct MockForecastService {
    /// Mock processing delay
    delay_ms: u64,

    /// Failure message, when configured to fail
    failure: Option<String>,

    /// Number of forecast calls received
    calls: AtomicUsize,
}

impl MockForecastService {
    /// Create a new mock service
    pub fn new() -> Self {
        Self::default()
    }

    /// Set processing delay
    #[must_use]
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Configure to fail every forecast
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of forecast calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn canned(request: &ForecastRequest) -> Forecast {
        let heating = request
            .metric("Heating Power")
            .map_or(HealthStatus::Good, |reading| reading.status);
        let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default();

        let (days, maintenance_type, reasoning, confidence) = match heating {
            HealthStatus::Critical => (
                7,
                "Emergency Repair",
                "Heating output has collapsed. The unit needs a technician before the next cold night.",
                92.0,
            ),
            HealthStatus::Warning => (
                90,
                "Heat Exchanger Inspection",
                "Heating output is trending down on an aging unit. A restricted airflow reading points to a clogged filter or failing blower.",
                78.0,
            ),
            HealthStatus::Good => (
                365,
                "Routine Tune-Up",
                "All readings are within normal ranges. Annual maintenance keeps efficiency high.",
                85.0,
            ),
        };

        Forecast {
            predicted_date: base
                .checked_add_days(Days::new(days))
                .unwrap_or(base)
                .format("%Y-%m-%d")
                .to_string(),
            maintenance_type: maintenance_type.to_string(),
            reasoning: reasoning.to_string(),
            confidence,
        }
    }
}

#[async_trait]
impl ForecastService for MockForecastService {
    async fn forecast(&self, request: &ForecastRequest) -> ForecastResult<Forecast> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Mock forecast {} for {} ({}ms delay)",
            request.id, request.system_id, self.delay_ms
        );

        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        if let Some(message) = &self.failure {
            return Err(ForecastError::service_communication(message.clone()));
        }

        Ok(Self::canned(request))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ambient_core::Catalog;
    use pretty_assertions::assert_eq;

    fn request(id: &str) -> ForecastRequest {
        let catalog = Catalog::seed();
        ForecastRequest::from_system(catalog.system(id).unwrap())
    }

    #[tokio::test]
    async fn test_mock_forecast_follows_heating_status() {
        let service = MockForecastService::new();

        let warning = service.forecast(&request("sys_001")).await.unwrap();
        assert_eq!(warning.maintenance_type, "Heat Exchanger Inspection");

        let critical = service.forecast(&request("sys_002")).await.unwrap();
        assert_eq!(critical.maintenance_type, "Emergency Repair");
        assert_eq!(critical.predicted_date, "2026-01-08");

        let good = service.forecast(&request("sys_003")).await.unwrap();
        assert_eq!(good.maintenance_type, "Routine Tune-Up");
        assert!(good.check().is_ok());

        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let service = MockForecastService::new().with_failure("offline");
        let err = service.forecast(&request("sys_001")).await.unwrap_err();

        assert!(err.to_string().contains("offline"));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_delay() {
        let service = MockForecastService::new().with_delay(400);
        let started = tokio::time::Instant::now();
        service.forecast(&request("sys_003")).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(400));
    }
}
