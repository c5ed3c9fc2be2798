//! Core forecast service trait

use crate::error::ForecastResult;
use crate::types::{Forecast, ForecastRequest};
use async_trait::async_trait;

/// Core trait for forecast backends
///
/// Implementations make one attempt per call; retrying is the caller's
/// decision.
#[async_trait]
pub trait ForecastService: Send + Sync + std::fmt::Debug {
    /// Produce a forecast for the system described by `request`
    async fn forecast(&self, request: &ForecastRequest) -> ForecastResult<Forecast>;

    /// Get service name
    fn name(&self) -> &str;
}
