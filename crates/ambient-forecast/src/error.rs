//! Error types for the forecast collaborator

use thiserror::Error;

/// Result type alias for forecast operations
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Errors that can occur while acquiring a forecast
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Service unavailable
    #[error("Forecast service unavailable: {service}")]
    ServiceUnavailable {
        /// Service name
        service: String,
    },

    /// Service communication error
    #[error("Failed to communicate with forecast service: {message}")]
    ServiceCommunication {
        /// Error message
        message: String,
    },

    /// Endpoint answered with a non-success status
    #[error("Forecast service returned HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Leading part of the response body
        body: String,
    },

    /// The response did not match the required schema
    #[error("Malformed forecast response: {reason}")]
    MalformedResponse {
        /// What was wrong with it
        reason: String,
    },

    /// Request timed out
    #[error("Forecast request timed out after {seconds} seconds")]
    Timeout {
        /// Timeout duration
        seconds: u64,
    },

    /// Configuration error
    #[error("Invalid forecast configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForecastError {
    /// Create a service unavailable error
    pub fn service_unavailable(service: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Create a service communication error
    pub fn service_communication(message: impl Into<String>) -> Self {
        Self::ServiceCommunication {
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub const fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Whether the payload itself was the problem, as opposed to transport
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. } | Self::Json(_))
    }
}

impl From<ForecastError> for ambient_core::Error {
    fn from(err: ForecastError) -> Self {
        Self::Forecast(err.to_string())
    }
}
