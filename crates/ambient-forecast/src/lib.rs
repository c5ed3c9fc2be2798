//! Maintenance forecasts for Ambient Twin systems
//!
//! A forecast is acquired once per detail-panel mount from either a canned
//! in-process backend or a remote generative model that answers in a fixed
//! JSON schema.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::unused_async,
    clippy::return_self_not_must_use,
    clippy::uninlined_format_args
)]

pub mod error;
pub mod generative;
pub mod mock;
pub mod service;
pub mod types;

use ambient_core::config::{ForecastBackend, ForecastConfig};
use std::sync::Arc;
use std::time::Duration;

pub use error::{ForecastError, ForecastResult};
pub use generative::GenerativeForecastService;
pub use mock::MockForecastService;
pub use service::ForecastService;
pub use types::{Forecast, ForecastRequest, MetricReading};

/// Build the configured forecast backend
pub fn build_service(config: &ForecastConfig) -> ForecastResult<Arc<dyn ForecastService>> {
    match config.backend {
        ForecastBackend::Mock => Ok(Arc::new(
            MockForecastService::new().with_delay(config.mock_delay_ms),
        )),
        ForecastBackend::Generative => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                ForecastError::configuration("generative backend requires an endpoint")
            })?;
            let service = GenerativeForecastService::new(
                endpoint,
                config.model.clone(),
                config.api_key.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?;
            Ok(Arc::new(service))
        }
    }
}
