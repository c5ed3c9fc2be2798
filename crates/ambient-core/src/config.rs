//! Configuration management for Ambient Twin

use crate::health::MetricThresholds;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Live telemetry simulation
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Health status thresholds
    #[serde(default)]
    pub thresholds: MetricThresholds,

    /// Generative forecast collaborator
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Home health certificate
    #[serde(default)]
    pub certificate: CertificateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Live telemetry simulation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelemetryConfig {
    /// Interval between live ticks in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Jitter bound; each tick moves the reading by at most half of it
    #[serde(default = "default_jitter_bound")]
    pub jitter_bound: f64,

    /// Chance per tick that the trend indicator flips
    #[serde(default = "default_trend_flip_probability")]
    pub trend_flip_probability: f64,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TelemetryConfig {
    /// Tick interval as a [`Duration`]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            jitter_bound: default_jitter_bound(),
            trend_flip_probability: default_trend_flip_probability(),
            seed: None,
        }
    }
}

/// Forecast backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForecastBackend {
    /// Canned in-process forecasts
    #[default]
    Mock,
    /// Remote generative JSON endpoint
    Generative,
}

/// Generative forecast collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastConfig {
    /// Request a forecast when a detail panel mounts
    #[serde(default = "default_forecast_enabled")]
    pub enabled: bool,

    /// Which backend answers forecast requests
    #[serde(default)]
    pub backend: ForecastBackend,

    /// Endpoint URL of the generative backend
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model name sent to the generative backend
    #[serde(default = "default_forecast_model")]
    pub model: String,

    /// API key for the generative backend
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_forecast_timeout")]
    pub timeout_seconds: u64,

    /// Artificial latency of the mock backend in milliseconds
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
}

impl ForecastConfig {
    /// Request timeout as a [`Duration`]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            enabled: default_forecast_enabled(),
            backend: ForecastBackend::default(),
            endpoint: None,
            model: default_forecast_model(),
            api_key: None,
            timeout_seconds: default_forecast_timeout(),
            mock_delay_ms: default_mock_delay_ms(),
        }
    }
}

/// Home health certificate settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CertificateConfig {
    /// Expected service life of a furnace in years
    #[serde(default = "default_service_life_years")]
    pub service_life_years: u32,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            service_life_years: default_service_life_years(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
const fn default_tick_interval_ms() -> u64 {
    2_500
}

const fn default_jitter_bound() -> f64 {
    2.0
}

const fn default_trend_flip_probability() -> f64 {
    0.1
}

const fn default_forecast_enabled() -> bool {
    true
}

fn default_forecast_model() -> String {
    "gemini-2.0-flash".to_string()
}

const fn default_forecast_timeout() -> u64 {
    20
}

const fn default_mock_delay_ms() -> u64 {
    400
}

const fn default_service_life_years() -> u32 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from an optional `ambient` file and `AMBIENT_*`
    /// environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file name
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("ambient").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("AMBIENT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::Error::configuration(e.to_string()))?
            .try_deserialize()
            .map_err(|e| crate::Error::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the dashboard cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] naming the first bad setting.
    pub fn validate(&self) -> crate::Result<()> {
        let telemetry = &self.telemetry;
        if telemetry.tick_interval_ms == 0 {
            return Err(crate::Error::configuration(
                "telemetry.tick_interval_ms must be greater than zero",
            ));
        }
        if !telemetry.jitter_bound.is_finite() || telemetry.jitter_bound < 0.0 {
            return Err(crate::Error::configuration(
                "telemetry.jitter_bound must be a non-negative number",
            ));
        }
        if !(0.0..=1.0).contains(&telemetry.trend_flip_probability) {
            return Err(crate::Error::configuration(
                "telemetry.trend_flip_probability must be within [0, 1]",
            ));
        }
        if !self.thresholds.heating_power.is_valid() || !self.thresholds.efficiency.is_valid() {
            return Err(crate::Error::configuration(
                "thresholds.good_at must not be below thresholds.warning_at",
            ));
        }
        if self.forecast.enabled
            && self.forecast.backend == ForecastBackend::Generative
            && self.forecast.endpoint.as_deref().is_none_or(str::is_empty)
        {
            return Err(crate::Error::configuration(
                "forecast.endpoint is required for the generative backend",
            ));
        }
        Ok(())
    }
}
