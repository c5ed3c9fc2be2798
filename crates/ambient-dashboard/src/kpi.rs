//! Header KPI tiles

use ambient_core::utils::format_dollars;
use ambient_core::{Catalog, HealthStatus};
use serde::Serialize;

/// Visual tone of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Good news
    Positive,
    /// Worth a look
    Caution,
    /// Bad news
    Negative,
}

impl Tone {
    /// Sparkline stroke colour
    pub const fn stroke(self) -> &'static str {
        match self {
            Self::Positive => "#38bdf8",
            Self::Caution => "#fbbf24",
            Self::Negative => "#fb7185",
        }
    }

    /// Sparkline points in a 70x20 viewBox
    pub const fn sparkline(self) -> &'static str {
        match self {
            Self::Positive => "5,15 15,12 25,18 35,10 45,14 55,8 65,5",
            Self::Caution | Self::Negative => "5,5 15,10 25,8 35,15 45,12 55,18 65,14",
        }
    }

    /// Whether the sparkline trends upward
    pub const fn is_rising(self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// One KPI tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiTile {
    /// Caption
    pub label: String,
    /// Formatted value
    pub value: String,
    /// Optional badge next to the value
    pub trend: Option<String>,
    /// Tone
    pub tone: Tone,
}

impl KpiTile {
    /// Create a tile
    pub fn new(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            trend: None,
            tone,
        }
    }

    /// Attach a trend badge
    #[must_use]
    pub fn with_trend(mut self, trend: impl Into<String>) -> Self {
        self.trend = Some(trend.into());
        self
    }
}

/// Systems whose heating power is not good plus active triage cases
pub fn active_alerts(catalog: &Catalog) -> usize {
    let degraded = catalog
        .systems
        .iter()
        .filter(|system| system.metrics.heating_power.status != HealthStatus::Good)
        .count();
    let cases = catalog
        .triage_cases
        .iter()
        .filter(|case| case.status.is_active())
        .count();
    degraded + cases
}

/// Estimated revenue of all open opportunities
pub fn open_revenue(catalog: &Catalog) -> u64 {
    catalog
        .opportunities
        .iter()
        .filter(|opportunity| opportunity.contract_status.is_open())
        .map(|opportunity| u64::from(opportunity.estimated_revenue))
        .sum()
}

/// The dashboard header tiles
pub fn header_tiles(catalog: &Catalog) -> Vec<KpiTile> {
    let alerts = active_alerts(catalog);
    let alert_tone = if alerts == 0 { Tone::Positive } else { Tone::Negative };
    vec![
        KpiTile::new("Systems Online", catalog.systems.len().to_string(), Tone::Positive)
            .with_trend("Live"),
        KpiTile::new("Active Alerts", alerts.to_string(), alert_tone),
        KpiTile::new(
            "Est. Revenue",
            format_dollars(open_revenue(catalog)),
            Tone::Positive,
        )
        .with_trend("Pipeline"),
    ]
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_header_kpis() {
        let catalog = Catalog::seed();
        // sys_001 Warning, sys_002 Critical, plus tc_1041 and tc_1042
        assert_eq!(active_alerts(&catalog), 4);
        assert_eq!(open_revenue(&catalog), 24_500);

        let tiles = header_tiles(&catalog);
        assert_eq!(tiles[1].value, "4");
        assert_eq!(tiles[1].tone, Tone::Negative);
        assert_eq!(tiles[2].value, "$24,500");
    }

    #[test]
    fn test_sparkline_direction() {
        assert!(Tone::Positive.is_rising());
        assert!(!Tone::Caution.is_rising());
        assert_eq!(Tone::Negative.sparkline(), Tone::Caution.sparkline());
        assert_ne!(Tone::Negative.stroke(), Tone::Caution.stroke());
    }

    #[test]
    fn test_empty_catalog() {
        let empty = Catalog {
            systems: Vec::new(),
            triage_cases: Vec::new(),
            opportunities: Vec::new(),
            clusters: Vec::new(),
        };
        assert_eq!(active_alerts(&empty), 0);
        assert_eq!(header_tiles(&empty)[1].tone, Tone::Positive);
    }
}
