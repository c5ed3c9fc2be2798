//! Static seed catalog
//!
//! The dashboard has no backend; every record it shows comes from here and
//! is created once at startup.

use crate::types::{
    CaseStatus, Cluster, ClusterStats, ContractStatus, HealthStatus, HvacSystem, Insight,
    InsightKind, Location, MarkerColor, Metric, MetricValue, Opportunity, PercentPoint,
    SystemMetrics, Trend, TriageCase, TriageOutcome,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashSet;
use validator::Validate;

/// In-memory catalog of every seeded record
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Monitored systems
    pub systems: Vec<HvacSystem>,
    /// Triage queue, the owning collection of cases
    pub triage_cases: Vec<TriageCase>,
    /// Sales pipeline
    pub opportunities: Vec<Opportunity>,
    /// Map clusters
    pub clusters: Vec<Cluster>,
}

impl Catalog {
    /// Build the seeded catalog
    pub fn seed() -> Self {
        Self {
            systems: seed_systems(),
            triage_cases: seed_triage_cases(),
            opportunities: seed_opportunities(),
            clusters: seed_clusters(),
        }
    }

    /// Look up a system by id
    pub fn system(&self, id: &str) -> Option<&HvacSystem> {
        self.systems.iter().find(|system| system.id == id)
    }

    /// Look up a system by id, failing with [`Error::NotFound`]
    pub fn require_system(&self, id: &str) -> Result<&HvacSystem> {
        self.system(id)
            .ok_or_else(|| Error::not_found(format!("system {id}")))
    }

    /// The case the system points at, if it is still in the queue
    pub fn active_case_for(&self, system: &HvacSystem) -> Option<&TriageCase> {
        let case_id = system.active_case.as_deref()?;
        self.triage_cases.iter().find(|case| case.id == case_id)
    }

    /// Triage cases ordered by priority rank, then by age
    pub fn queue_by_priority(&self) -> Vec<&TriageCase> {
        let mut queue: Vec<_> = self.triage_cases.iter().collect();
        queue.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.opened_at.cmp(&b.opened_at))
        });
        queue
    }

    /// Opportunities ordered by estimated revenue, largest first
    pub fn pipeline_by_revenue(&self) -> Vec<&Opportunity> {
        let mut pipeline: Vec<_> = self.opportunities.iter().collect();
        pipeline.sort_by(|a, b| b.estimated_revenue.cmp(&a.estimated_revenue));
        pipeline
    }

    /// Look up a cluster by id
    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.id == id)
    }

    /// Check field ranges, id uniqueness and triage back-references
    pub fn validate(&self) -> Result<()> {
        for system in &self.systems {
            system.validate()?;
        }
        for case in &self.triage_cases {
            case.validate()?;
        }
        for opportunity in &self.opportunities {
            opportunity.validate()?;
        }

        ensure_unique("systems", self.systems.iter().map(|s| s.id.as_str()))?;
        ensure_unique("triage_cases", self.triage_cases.iter().map(|c| c.id.as_str()))?;
        ensure_unique("clusters", self.clusters.iter().map(|c| c.id.as_str()))?;

        let mut claimed = HashSet::new();
        for system in &self.systems {
            let Some(case_id) = system.active_case.as_deref() else {
                continue;
            };
            if self.active_case_for(system).is_none() {
                return Err(Error::validation(
                    "active_case",
                    format!("{} points at unknown case {case_id}", system.id),
                ));
            }
            if !claimed.insert(case_id) {
                return Err(Error::validation(
                    "active_case",
                    format!("case {case_id} is active on more than one system"),
                ));
            }
        }

        for cluster in &self.clusters {
            let PercentPoint { top, left } = cluster.position;
            if !(0.0..=100.0).contains(&top) || !(0.0..=100.0).contains(&left) {
                return Err(Error::validation(
                    "position",
                    format!("cluster {} is off the canvas", cluster.id),
                ));
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

fn ensure_unique<'a>(collection: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::validation(
                collection,
                format!("duplicate id {id}"),
            ));
        }
    }
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn heating_power(value: f64, status: HealthStatus, trend: Trend) -> Metric {
    Metric {
        label: "Heating Power".to_string(),
        value: MetricValue::Number(value),
        unit: Some("%".to_string()),
        status,
        trend: Some(trend),
        simple_english_label: "Heating Output".to_string(),
        technical_label: "Delta-T".to_string(),
    }
}

fn system_breathing(value: &str, status: HealthStatus, trend: Option<Trend>) -> Metric {
    Metric {
        label: "System Breathing".to_string(),
        value: MetricValue::Label(value.to_string()),
        unit: None,
        status,
        trend,
        simple_english_label: "Airflow Health".to_string(),
        technical_label: "Static Pressure".to_string(),
    }
}

fn efficiency(value: f64, status: HealthStatus) -> Metric {
    Metric {
        label: "Efficiency".to_string(),
        value: MetricValue::Number(value),
        unit: Some("%".to_string()),
        status,
        trend: None,
        simple_english_label: "Fuel Economy".to_string(),
        technical_label: "AFUE".to_string(),
    }
}

fn seed_systems() -> Vec<HvacSystem> {
    vec![
        HvacSystem {
            id: "sys_001".to_string(),
            address: "1288 Yonge St, Toronto".to_string(),
            owner_name: "Sarah Jenkins".to_string(),
            system_type: "Lennox SLP99V".to_string(),
            install_date: date(2012, 5, 15),
            last_service_date: date(2025, 11, 1),
            location: Location {
                lat: 43.68,
                lng: -79.39,
                neighborhood: "North York".to_string(),
            },
            metrics: SystemMetrics {
                heating_power: heating_power(72.0, HealthStatus::Warning, Trend::Down),
                system_breathing: system_breathing(
                    "Restricted",
                    HealthStatus::Warning,
                    Some(Trend::Down),
                ),
                efficiency: efficiency(85.0, HealthStatus::Warning),
            },
            insights: vec![Insight {
                kind: InsightKind::LeadGen,
                title: "High-Margin Upgrade Lead".to_string(),
                description: "System is >10 years old with declining heating power.".to_string(),
                value_prop: Some("$6,500 Rebate Qualified".to_string()),
                is_urgent: true,
                predicted_failure_date: Some(date(2027, 1, 15)),
            }],
            active_case: Some("tc_1042".to_string()),
        },
        HvacSystem {
            id: "sys_002".to_string(),
            address: "45 Bay St, Toronto".to_string(),
            owner_name: "Michael Chen".to_string(),
            system_type: "Carrier Infinity 98".to_string(),
            install_date: date(2023, 8, 10),
            last_service_date: date(2025, 12, 20),
            location: Location {
                lat: 43.64,
                lng: -79.37,
                neighborhood: "Downtown Core".to_string(),
            },
            metrics: SystemMetrics {
                heating_power: heating_power(0.0, HealthStatus::Critical, Trend::Stable),
                system_breathing: system_breathing("Normal", HealthStatus::Good, None),
                efficiency: efficiency(0.0, HealthStatus::Critical),
            },
            insights: vec![Insight {
                kind: InsightKind::NuisanceFilter,
                title: "Potential Remote Resolution".to_string(),
                description: "Thermostat calling for heat, but output is 0. Weather is mild."
                    .to_string(),
                value_prop: Some("Breaker Tripped?".to_string()),
                is_urgent: false,
                predicted_failure_date: None,
            }],
            active_case: Some("tc_1041".to_string()),
        },
        HvacSystem {
            id: "sys_003".to_string(),
            address: "880 The Queensway, Etobicoke".to_string(),
            owner_name: "David Rossi".to_string(),
            system_type: "Ecobee Smart + Rheem".to_string(),
            install_date: date(2024, 1, 15),
            last_service_date: date(2026, 1, 10),
            location: Location {
                lat: 43.62,
                lng: -79.51,
                neighborhood: "Etobicoke".to_string(),
            },
            metrics: SystemMetrics {
                heating_power: heating_power(98.0, HealthStatus::Good, Trend::Stable),
                system_breathing: system_breathing("Optimal", HealthStatus::Good, None),
                efficiency: efficiency(98.0, HealthStatus::Good),
            },
            insights: Vec::new(),
            active_case: None,
        },
    ]
}

fn seed_triage_cases() -> Vec<TriageCase> {
    vec![
        TriageCase {
            id: "tc_1041".to_string(),
            opened_at: timestamp(2026, 1, 14, 6, 12),
            source: "Thermostat".to_string(),
            reason: "No heat reported while thermostat is calling for heat".to_string(),
            suggested_outcome: TriageOutcome::DryRun,
            status: CaseStatus::InProgress,
            priority: 1,
            health_score: 12,
        },
        TriageCase {
            id: "tc_1042".to_string(),
            opened_at: timestamp(2026, 1, 14, 6, 40),
            source: "Telemetry".to_string(),
            reason: "Heating output declining on a 13 year old furnace".to_string(),
            suggested_outcome: TriageOutcome::HighMarginLead,
            status: CaseStatus::Open,
            priority: 2,
            health_score: 64,
        },
        TriageCase {
            id: "tc_1039".to_string(),
            opened_at: timestamp(2026, 1, 13, 21, 5),
            source: "Homeowner call".to_string(),
            reason: "Short cycling overnight".to_string(),
            suggested_outcome: TriageOutcome::Dispatch,
            status: CaseStatus::Dispatched,
            priority: 3,
            health_score: 48,
        },
        TriageCase {
            id: "tc_1036".to_string(),
            opened_at: timestamp(2026, 1, 12, 15, 30),
            source: "Telemetry".to_string(),
            reason: "Static pressure drifting upward".to_string(),
            suggested_outcome: TriageOutcome::Monitor,
            status: CaseStatus::Resolved,
            priority: 4,
            health_score: 81,
        },
    ]
}

fn seed_opportunities() -> Vec<Opportunity> {
    vec![
        Opportunity {
            id: "opp_201".to_string(),
            customer: "Sarah Jenkins".to_string(),
            address: "1288 Yonge St, Toronto".to_string(),
            system_age_years: 13,
            health_score: 64,
            estimated_revenue: 6_500,
            contract_status: ContractStatus::Quoted,
            next_action: "Send rebate paperwork".to_string(),
        },
        Opportunity {
            id: "opp_202".to_string(),
            customer: "Michael Chen".to_string(),
            address: "45 Bay St, Toronto".to_string(),
            system_age_years: 2,
            health_score: 12,
            estimated_revenue: 1_000,
            contract_status: ContractStatus::MaintenancePlan,
            next_action: "Confirm breaker reset with homeowner".to_string(),
        },
        Opportunity {
            id: "opp_203".to_string(),
            customer: "Priya Natarajan".to_string(),
            address: "17 Glen Rd, Toronto".to_string(),
            system_age_years: 16,
            health_score: 52,
            estimated_revenue: 9_800,
            contract_status: ContractStatus::NoContract,
            next_action: "Book in-home assessment".to_string(),
        },
        Opportunity {
            id: "opp_204".to_string(),
            customer: "Tom Kowalski".to_string(),
            address: "302 Pape Ave, Toronto".to_string(),
            system_age_years: 11,
            health_score: 61,
            estimated_revenue: 7_200,
            contract_status: ContractStatus::Quoted,
            next_action: "Follow up on heat pump quote".to_string(),
        },
        Opportunity {
            id: "opp_199".to_string(),
            customer: "Lena Park".to_string(),
            address: "9 Elm Dr, Scarborough".to_string(),
            system_age_years: 4,
            health_score: 91,
            estimated_revenue: 4_000,
            contract_status: ContractStatus::Won,
            next_action: "Schedule install".to_string(),
        },
    ]
}

fn seed_clusters() -> Vec<Cluster> {
    vec![
        Cluster {
            id: "north-york".to_string(),
            name: "North York".to_string(),
            color: MarkerColor::Amber,
            position: PercentPoint {
                top: 20.0,
                left: 45.0,
            },
            stats: ClusterStats {
                critical_count: 5,
                revenue: 32_500,
                average_age_years: 12.4,
            },
        },
        Cluster {
            id: "etobicoke".to_string(),
            name: "Etobicoke".to_string(),
            color: MarkerColor::Green,
            position: PercentPoint {
                top: 40.0,
                left: 25.0,
            },
            stats: ClusterStats {
                critical_count: 2,
                revenue: 9_800,
                average_age_years: 6.1,
            },
        },
        Cluster {
            id: "downtown".to_string(),
            name: "Downtown".to_string(),
            color: MarkerColor::Red,
            position: PercentPoint {
                top: 65.0,
                left: 50.0,
            },
            stats: ClusterStats {
                critical_count: 8,
                revenue: 48_000,
                average_age_years: 14.8,
            },
        },
        Cluster {
            id: "scarborough".to_string(),
            name: "Scarborough".to_string(),
            color: MarkerColor::Green,
            position: PercentPoint {
                top: 35.0,
                left: 70.0,
            },
            stats: ClusterStats {
                critical_count: 3,
                revenue: 15_200,
                average_age_years: 9.3,
            },
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_catalog_is_valid() {
        Catalog::seed().validate().unwrap();
    }

    #[test]
    fn test_seed_dates_are_real() {
        let catalog = Catalog::seed();
        for system in &catalog.systems {
            assert_ne!(system.install_date, NaiveDate::default());
        }
        for case in &catalog.triage_cases {
            assert_ne!(case.opened_at, DateTime::<Utc>::default());
        }
    }

    #[test]
    fn test_active_case_lookup() {
        let catalog = Catalog::seed();
        let system = catalog.system("sys_002").unwrap();
        let case = catalog.active_case_for(system).unwrap();
        assert_eq!(case.suggested_outcome, TriageOutcome::DryRun);

        let healthy = catalog.system("sys_003").unwrap();
        assert!(catalog.active_case_for(healthy).is_none());
    }

    #[test]
    fn test_require_system_not_found() {
        let catalog = Catalog::seed();
        let err = catalog.require_system("sys_404").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_queue_order() {
        let catalog = Catalog::seed();
        let ids: Vec<_> = catalog
            .queue_by_priority()
            .into_iter()
            .map(|case| case.id.as_str())
            .collect();
        assert_eq!(ids, vec!["tc_1041", "tc_1042", "tc_1039", "tc_1036"]);
    }

    #[test]
    fn test_pipeline_order() {
        let catalog = Catalog::seed();
        let revenue: Vec<_> = catalog
            .pipeline_by_revenue()
            .into_iter()
            .map(|opp| opp.estimated_revenue)
            .collect();
        assert_eq!(revenue, vec![9_800, 7_200, 6_500, 4_000, 1_000]);
    }

    #[test]
    fn test_dangling_case_reference_rejected() {
        let mut catalog = Catalog::seed();
        catalog.systems[2].active_case = Some("tc_9999".to_string());
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("unknown case tc_9999"));
    }

    #[test]
    fn test_shared_active_case_rejected() {
        let mut catalog = Catalog::seed();
        catalog.systems[2].active_case = Some("tc_1041".to_string());
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("more than one system"));
    }

    #[test]
    fn test_out_of_range_health_score_rejected() {
        let mut catalog = Catalog::seed();
        catalog.triage_cases[0].health_score = 140;
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
