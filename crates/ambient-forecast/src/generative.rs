//! Generative JSON endpoint forecast backend

use crate::error::{ForecastError, ForecastResult};
use crate::service::ForecastService;
use crate::types::{Forecast, ForecastRequest, response_schema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY: usize = 256;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Forecast backend calling a remote generative model
///
/// One POST per forecast with a JSON response schema; no retries.
#[derive(Debug)]
pub struct GenerativeForecastService {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GenerativeForecastService {
    /// Create a backend for `endpoint` and `model`
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> ForecastResult<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ForecastError::configuration("endpoint must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            timeout,
        })
    }

    /// Full URL of the content generation call
    pub fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    fn body(request: &ForecastRequest) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.prompt()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ForecastError {
        if err.is_timeout() {
            ForecastError::timeout(self.timeout.as_secs())
        } else if err.is_connect() {
            ForecastError::service_communication(err.to_string())
        } else {
            ForecastError::Http(err)
        }
    }
}

#[async_trait]
impl ForecastService for GenerativeForecastService {
    async fn forecast(&self, request: &ForecastRequest) -> ForecastResult<Forecast> {
        let url = self.url();
        info!("Requesting forecast {} for {} from {}", request.id, request.system_id, url);

        let mut builder = self.client.post(&url).json(&Self::body(request));
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let mut body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            warn!("Forecast {} failed with HTTP {}", request.id, status);
            return Err(ForecastError::HttpStatus { status, body });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::malformed(format!("envelope: {e}")))?;

        let text = payload
            .first_text()
            .ok_or_else(|| ForecastError::malformed("no candidate text in response"))?;

        let forecast = Forecast::from_json(&text)?;
        info!(
            "Forecast {} ready: {} on {} ({}% confidence)",
            request.id, forecast.maintenance_type, forecast.predicted_date, forecast.confidence
        );
        Ok(forecast)
    }

    fn name(&self) -> &str {
        "generative"
    }
}
