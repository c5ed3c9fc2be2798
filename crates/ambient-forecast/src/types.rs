//! Request and response types for forecast acquisition

use crate::error::{ForecastError, ForecastResult};
use ambient_core::types::{HvacSystem, MetricKind};
use ambient_core::{HealthStatus, SystemId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Fixed instruction sent ahead of the structured input
pub const FORECAST_INSTRUCTION: &str = "You are a predictive maintenance analyst for residential \
HVAC equipment. Using the equipment identity and current telemetry below, predict when this \
system will next need maintenance, what kind of maintenance it will need, explain your \
reasoning in two sentences, and rate your confidence from 0 to 100. Answer only with JSON \
matching the provided schema.";

/// One metric as sent to the forecast backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricReading {
    /// Dashboard label
    pub name: String,
    /// Technician label
    pub technical_label: String,
    /// Reading with unit
    pub value: String,
    /// Health status
    pub status: HealthStatus,
}

/// A forecast request for one system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    /// Request identifier for tracing
    pub id: Uuid,
    /// System the forecast is for
    pub system_id: SystemId,
    /// Street address
    pub address: String,
    /// Equipment make and model
    pub equipment_type: String,
    /// Install date
    pub install_date: NaiveDate,
    /// Current metrics
    pub metrics: Vec<MetricReading>,
    /// When the request was built
    pub requested_at: DateTime<Utc>,
}

impl ForecastRequest {
    /// Build a request from the current state of a system
    pub fn from_system(system: &HvacSystem) -> Self {
        let metrics = MetricKind::ALL
            .into_iter()
            .map(|kind| {
                let metric = system.metrics.get(kind);
                MetricReading {
                    name: metric.label.clone(),
                    technical_label: metric.technical_label.clone(),
                    value: metric.display_value(),
                    status: metric.status,
                }
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            system_id: system.id.clone(),
            address: system.address.clone(),
            equipment_type: system.system_type.clone(),
            install_date: system.install_date,
            metrics,
            requested_at: Utc::now(),
        }
    }

    /// Reading for a metric label, if present
    pub fn metric(&self, name: &str) -> Option<&MetricReading> {
        self.metrics.iter().find(|metric| metric.name == name)
    }

    /// Natural-language prompt: the fixed instruction plus structured input
    pub fn prompt(&self) -> String {
        let mut prompt = String::from(FORECAST_INSTRUCTION);
        prompt.push_str("\n\nAddress: ");
        prompt.push_str(&self.address);
        prompt.push_str("\nEquipment: ");
        prompt.push_str(&self.equipment_type);
        prompt.push_str("\nInstalled: ");
        prompt.push_str(&self.install_date.format("%Y-%m-%d").to_string());
        prompt.push_str("\nCurrent metrics:");
        for metric in &self.metrics {
            prompt.push_str(&format!(
                "\n- {} ({}): {} [{}]",
                metric.name, metric.technical_label, metric.value, metric.status
            ));
        }
        prompt
    }
}

/// A structured maintenance prediction
///
/// Exactly four fields; anything else in the payload is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Forecast {
    /// Predicted maintenance date as returned by the backend
    #[validate(length(min = 1))]
    pub predicted_date: String,

    /// Kind of maintenance expected
    #[validate(length(min = 1))]
    pub maintenance_type: String,

    /// Free-text reasoning
    pub reasoning: String,

    /// Confidence from 0 to 100
    #[validate(range(min = 0.0, max = 100.0))]
    pub confidence: f64,
}

impl Forecast {
    /// Parse and validate a forecast from JSON text
    pub fn from_json(text: &str) -> ForecastResult<Self> {
        let forecast: Self = serde_json::from_str(text.trim())
            .map_err(|e| ForecastError::malformed(e.to_string()))?;
        forecast.check()?;
        Ok(forecast)
    }

    /// Validate field contents
    pub fn check(&self) -> ForecastResult<()> {
        if !self.confidence.is_finite() {
            return Err(ForecastError::malformed("confidence is not a number"));
        }
        self.validate()
            .map_err(|e| ForecastError::malformed(e.to_string()))
    }
}

/// JSON schema the backend must answer with
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "predictedDate": {
                "type": "STRING",
                "description": "Predicted date of the next maintenance need, YYYY-MM-DD"
            },
            "maintenanceType": {
                "type": "STRING",
                "description": "Kind of maintenance expected"
            },
            "reasoning": {
                "type": "STRING",
                "description": "Short explanation of the prediction"
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Confidence from 0 to 100"
            }
        },
        "required": ["predictedDate", "maintenanceType", "reasoning", "confidence"]
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use ambient_core::Catalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_from_system() {
        let catalog = Catalog::seed();
        let request = ForecastRequest::from_system(catalog.system("sys_001").unwrap());

        assert_eq!(request.system_id, "sys_001");
        assert_eq!(request.equipment_type, "Lennox SLP99V");
        assert_eq!(request.metrics.len(), 3);
        let heating = request.metric("Heating Power").unwrap();
        assert_eq!(heating.value, "72%");
        assert_eq!(heating.status, HealthStatus::Warning);
    }

    #[test]
    fn test_prompt_contains_structured_input() {
        let catalog = Catalog::seed();
        let prompt = ForecastRequest::from_system(catalog.system("sys_001").unwrap()).prompt();

        assert!(prompt.starts_with(FORECAST_INSTRUCTION));
        assert!(prompt.contains("Address: 1288 Yonge St, Toronto"));
        assert!(prompt.contains("Installed: 2012-05-15"));
        assert!(prompt.contains("- System Breathing (Static Pressure): Restricted [Warning]"));
    }

    #[test]
    fn test_forecast_from_json() {
        let forecast = Forecast::from_json(
            r#"{"predictedDate":"2027-01-15","maintenanceType":"Heat exchanger inspection",
                "reasoning":"Declining Delta-T on an aging unit.","confidence":78}"#,
        )
        .unwrap();
        assert_eq!(forecast.predicted_date, "2027-01-15");
        assert_eq!(forecast.confidence, 78.0);
    }

    #[test]
    fn test_forecast_rejects_missing_field() {
        let err = Forecast::from_json(
            r#"{"predictedDate":"2027-01-15","maintenanceType":"Tune-up","confidence":50}"#,
        )
        .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_forecast_rejects_extra_field() {
        let err = Forecast::from_json(
            r#"{"predictedDate":"2027-01-15","maintenanceType":"Tune-up","reasoning":"x",
                "confidence":50,"severity":"high"}"#,
        )
        .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_forecast_rejects_confidence_out_of_range() {
        let err = Forecast::from_json(
            r#"{"predictedDate":"2027-01-15","maintenanceType":"Tune-up","reasoning":"x",
                "confidence":140}"#,
        )
        .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_forecast_rejects_empty_date() {
        let err = Forecast::from_json(
            r#"{"predictedDate":"","maintenanceType":"Tune-up","reasoning":"x","confidence":10}"#,
        )
        .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_response_schema_requires_four_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 4);
        assert_eq!(schema["properties"].as_object().unwrap().len(), 4);
    }
}
