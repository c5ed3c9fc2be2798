//! Canonical health thresholds
//!
//! Status is derived from a numeric reading with two cut-offs per metric:
//! readings at or above `good_at` are [`HealthStatus::Good`], readings at or
//! above `warning_at` are [`HealthStatus::Warning`], everything else is
//! [`HealthStatus::Critical`]. Enumerated readings (airflow) keep their
//! authored status.

use crate::types::{HealthStatus, HvacSystem, MetricKind, SystemId};
use serde::{Deserialize, Serialize};

/// Cut-offs for one metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    /// Lowest reading considered good
    pub good_at: f64,
    /// Lowest reading considered a warning
    pub warning_at: f64,
}

impl Thresholds {
    /// Create thresholds
    pub const fn new(good_at: f64, warning_at: f64) -> Self {
        Self {
            good_at,
            warning_at,
        }
    }

    /// Status for a reading
    pub fn classify(&self, value: f64) -> HealthStatus {
        if value >= self.good_at {
            HealthStatus::Good
        } else if value >= self.warning_at {
            HealthStatus::Warning
        } else {
            HealthStatus::Critical
        }
    }

    /// Whether the cut-offs are ordered and finite
    pub fn is_valid(&self) -> bool {
        self.good_at.is_finite() && self.warning_at.is_finite() && self.good_at >= self.warning_at
    }
}

/// Thresholds for every numeric metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricThresholds {
    /// Heating output (Delta-T percentage)
    #[serde(default = "default_heating_power")]
    pub heating_power: Thresholds,

    /// Fuel economy (AFUE percentage)
    #[serde(default = "default_efficiency")]
    pub efficiency: Thresholds,
}

const fn default_heating_power() -> Thresholds {
    Thresholds::new(80.0, 50.0)
}

const fn default_efficiency() -> Thresholds {
    Thresholds::new(90.0, 80.0)
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            heating_power: default_heating_power(),
            efficiency: default_efficiency(),
        }
    }
}

impl MetricThresholds {
    /// Thresholds for a metric, `None` for enumerated metrics
    pub const fn for_kind(&self, kind: MetricKind) -> Option<Thresholds> {
        match kind {
            MetricKind::HeatingPower => Some(self.heating_power),
            MetricKind::Efficiency => Some(self.efficiency),
            MetricKind::SystemBreathing => None,
        }
    }

    /// Derived status for a numeric reading of `kind`
    pub fn status_for(&self, kind: MetricKind, value: f64) -> Option<HealthStatus> {
        self.for_kind(kind).map(|t| t.classify(value))
    }

    /// Metrics of `system` whose authored status disagrees with the thresholds
    pub fn inconsistencies(&self, system: &HvacSystem) -> Vec<(SystemId, MetricKind)> {
        MetricKind::ALL
            .into_iter()
            .filter(|&kind| {
                let metric = system.metrics.get(kind);
                metric
                    .value
                    .as_number()
                    .and_then(|value| self.status_for(kind, value))
                    .is_some_and(|derived| derived != metric.status)
            })
            .map(|kind| (system.id.clone(), kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Catalog;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, HealthStatus::Good)]
    #[case(80.0, HealthStatus::Good)]
    #[case(79.99, HealthStatus::Warning)]
    #[case(72.0, HealthStatus::Warning)]
    #[case(50.0, HealthStatus::Warning)]
    #[case(49.99, HealthStatus::Critical)]
    #[case(0.0, HealthStatus::Critical)]
    fn test_heating_thresholds(#[case] value: f64, #[case] expected: HealthStatus) {
        let thresholds = MetricThresholds::default();
        assert_eq!(
            thresholds.status_for(MetricKind::HeatingPower, value),
            Some(expected)
        );
    }

    #[rstest]
    #[case(98.0, HealthStatus::Good)]
    #[case(85.0, HealthStatus::Warning)]
    #[case(0.0, HealthStatus::Critical)]
    fn test_efficiency_thresholds(#[case] value: f64, #[case] expected: HealthStatus) {
        let thresholds = MetricThresholds::default();
        assert_eq!(
            thresholds.status_for(MetricKind::Efficiency, value),
            Some(expected)
        );
    }

    #[test]
    fn test_breathing_has_no_thresholds() {
        let thresholds = MetricThresholds::default();
        assert_eq!(
            thresholds.status_for(MetricKind::SystemBreathing, 50.0),
            None
        );
    }

    #[test]
    fn test_seed_statuses_match_thresholds() {
        let thresholds = MetricThresholds::default();
        let catalog = Catalog::seed();
        let mismatches: Vec<_> = catalog
            .systems
            .iter()
            .flat_map(|system| thresholds.inconsistencies(system))
            .collect();
        assert!(mismatches.is_empty(), "inconsistent seeds: {mismatches:?}");
    }

    #[test]
    fn test_threshold_validity() {
        assert!(Thresholds::new(80.0, 50.0).is_valid());
        assert!(!Thresholds::new(40.0, 50.0).is_valid());
        assert!(!Thresholds::new(f64::NAN, 50.0).is_valid());
    }
}
