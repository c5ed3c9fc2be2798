//! Core data types for Ambient Twin
//!
//! The model mirrors what an HVAC fleet dashboard shows: monitored systems
//! with three named metrics, AI insights attached to them, the triage queue,
//! the sales pipeline and the geographic clusters on the map widget.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// System identifier type
pub type SystemId = String;

/// Triage case identifier type
pub type CaseId = String;

/// Cluster identifier type
pub type ClusterId = String;

/// Health status of a metric
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HealthStatus {
    /// Operating normally
    Good,
    /// Degraded, worth a look
    Warning,
    /// Failed or failing
    Critical,
}

impl HealthStatus {
    /// Whether the status needs operator attention
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Warning | Self::Critical)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Warning => write!(f, "Warning"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Direction a metric is moving
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Increasing
    Up,
    /// Decreasing
    Down,
    /// Flat
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// A metric reading: either a number or a short enumerated label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    /// Numeric reading (percentages for the seeded metrics)
    Number(f64),
    /// Enumerated reading such as "Restricted"
    Label(String),
}

impl MetricValue {
    /// Numeric value, if this reading is numeric
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Label(_) => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", crate::utils::format_number(*value)),
            Self::Label(label) => write!(f, "{label}"),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

/// The three metrics every monitored system reports
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Heating output, measured as Delta-T
    HeatingPower,
    /// Airflow health, measured as static pressure
    SystemBreathing,
    /// Fuel economy, measured as AFUE
    Efficiency,
}

impl MetricKind {
    /// All metric kinds in display order
    pub const ALL: [Self; 3] = [Self::HeatingPower, Self::SystemBreathing, Self::Efficiency];
}

/// A single metric of a monitored system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Dashboard label
    pub label: String,

    /// Current reading
    pub value: MetricValue,

    /// Unit suffix, e.g. `%`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Health status
    pub status: HealthStatus,

    /// Trend indicator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,

    /// Homeowner-facing label ("Heating Output")
    pub simple_english_label: String,

    /// Technician-facing label ("Delta-T")
    pub technical_label: String,
}

impl Metric {
    /// Reading with its unit, e.g. `72%`
    pub fn display_value(&self) -> String {
        format!("{}{}", self.value, self.unit.as_deref().unwrap_or_default())
    }
}

/// The fixed metric set of a system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    /// Heating output (Delta-T)
    pub heating_power: Metric,
    /// Airflow health (static pressure)
    pub system_breathing: Metric,
    /// Fuel economy (AFUE)
    pub efficiency: Metric,
}

impl SystemMetrics {
    /// Borrow a metric by kind
    pub const fn get(&self, kind: MetricKind) -> &Metric {
        match kind {
            MetricKind::HeatingPower => &self.heating_power,
            MetricKind::SystemBreathing => &self.system_breathing,
            MetricKind::Efficiency => &self.efficiency,
        }
    }

    /// Mutably borrow a metric by kind
    pub const fn get_mut(&mut self, kind: MetricKind) -> &mut Metric {
        match kind {
            MetricKind::HeatingPower => &mut self.heating_power,
            MetricKind::SystemBreathing => &mut self.system_breathing,
            MetricKind::Efficiency => &mut self.efficiency,
        }
    }
}

/// Classification tag of an insight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightKind {
    /// Suspected false alarm that can be resolved remotely
    NuisanceFilter,
    /// Sales opportunity
    LeadGen,
    /// Scheduled or predicted maintenance
    Maintenance,
}

/// An AI-generated insight attached to a system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Classification tag
    #[serde(rename = "type")]
    pub kind: InsightKind,

    /// Short title
    pub title: String,

    /// Longer description
    pub description: String,

    /// Value proposition badge, e.g. a rebate amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_prop: Option<String>,

    /// Urgent insights get the gold treatment on the dashboard
    pub is_urgent: bool,

    /// Predicted failure date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_failure_date: Option<NaiveDate>,
}

/// Geographic location of a system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Neighbourhood label
    pub neighborhood: String,
}

/// A monitored HVAC system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HvacSystem {
    /// Identifier
    #[validate(length(min = 1, max = 64))]
    pub id: SystemId,

    /// Street address
    #[validate(length(min = 1))]
    pub address: String,

    /// Owner name
    pub owner_name: String,

    /// Equipment make and model
    pub system_type: String,

    /// Install date
    pub install_date: NaiveDate,

    /// Last service date
    pub last_service_date: NaiveDate,

    /// Location on the map
    pub location: Location,

    /// Metric set
    pub metrics: SystemMetrics,

    /// Insights in display order
    #[serde(default)]
    pub insights: Vec<Insight>,

    /// Back-reference into the triage queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_case: Option<CaseId>,
}

impl HvacSystem {
    /// Whole years since install as of `today`
    pub fn age_years(&self, today: NaiveDate) -> u32 {
        let mut years = today.year() - self.install_date.year();
        if (today.month(), today.day()) < (self.install_date.month(), self.install_date.day()) {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }

    /// Whether any insight is urgent
    pub fn has_urgent_insight(&self) -> bool {
        self.insights.iter().any(|insight| insight.is_urgent)
    }

    /// First urgent insight, if any
    pub fn first_urgent_insight(&self) -> Option<&Insight> {
        self.insights.iter().find(|insight| insight.is_urgent)
    }
}

/// Suggested resolution of a triage case
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TriageOutcome {
    /// Resolvable without a truck visit
    #[serde(rename = "Dry Run")]
    DryRun,
    /// Send a technician
    Dispatch,
    /// Keep watching
    Monitor,
    /// Route to sales
    #[serde(rename = "High-margin Lead")]
    HighMarginLead,
}

impl std::fmt::Display for TriageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DryRun => write!(f, "Dry Run"),
            Self::Dispatch => write!(f, "Dispatch"),
            Self::Monitor => write!(f, "Monitor"),
            Self::HighMarginLead => write!(f, "High-margin Lead"),
        }
    }
}

/// Lifecycle of a triage case
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CaseStatus {
    /// Not yet picked up
    Open,
    /// Being worked
    #[serde(rename = "In Progress")]
    InProgress,
    /// Closed without dispatch
    Resolved,
    /// Technician dispatched
    Dispatched,
}

impl CaseStatus {
    /// Whether the case still counts as an active alert
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Resolved => write!(f, "Resolved"),
            Self::Dispatched => write!(f, "Dispatched"),
        }
    }
}

/// An anomaly awaiting a dispatch/monitor/resolve decision
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TriageCase {
    /// Identifier
    #[validate(length(min = 1, max = 64))]
    pub id: CaseId,

    /// When the case was opened
    pub opened_at: DateTime<Utc>,

    /// Source channel ("Thermostat", "Homeowner call", ...)
    pub source: String,

    /// Free-text reason
    pub reason: String,

    /// Suggested outcome
    pub suggested_outcome: TriageOutcome,

    /// Current status
    pub status: CaseStatus,

    /// Priority rank, 1 is most urgent
    #[validate(range(min = 1))]
    pub priority: u8,

    /// Health score of the affected system
    #[validate(range(max = 100))]
    pub health_score: u8,
}

/// Sales-pipeline stage of an opportunity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// No contract on file
    NoContract,
    /// Maintenance plan on file
    MaintenancePlan,
    /// Quote sent
    Quoted,
    /// Deal closed
    Won,
}

impl ContractStatus {
    /// Whether the opportunity still contributes to projected revenue
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Won)
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoContract => write!(f, "No Contract"),
            Self::MaintenancePlan => write!(f, "Maintenance Plan"),
            Self::Quoted => write!(f, "Quoted"),
            Self::Won => write!(f, "Won"),
        }
    }
}

/// A sales-pipeline record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    /// Identifier
    pub id: String,

    /// Customer name
    pub customer: String,

    /// Street address
    pub address: String,

    /// Age of the installed system in years
    pub system_age_years: u32,

    /// Health score
    #[validate(range(max = 100))]
    pub health_score: u8,

    /// Estimated revenue in whole dollars
    pub estimated_revenue: u32,

    /// Contract status
    pub contract_status: ContractStatus,

    /// Next sales action
    pub next_action: String,
}

/// Marker colour on the cluster map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    /// Mostly healthy
    Green,
    /// Some struggling systems
    Amber,
    /// Many struggling systems
    Red,
}

impl MarkerColor {
    /// Hex colour used for the marker
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#10b981",
            Self::Amber => "#f59e0b",
            Self::Red => "#ef4444",
        }
    }
}

/// Position of a marker as percentages of the map canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PercentPoint {
    /// Distance from the top edge, 0-100
    pub top: f64,
    /// Distance from the left edge, 0-100
    pub left: f64,
}

/// Aggregate statistics of a cluster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStats {
    /// Systems in critical condition
    pub critical_count: u32,
    /// Revenue opportunity in whole dollars
    pub revenue: u32,
    /// Average system age in years
    pub average_age_years: f64,
}

/// A geographic grouping of systems on the map widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    /// Identifier
    pub id: ClusterId,
    /// Display name
    pub name: String,
    /// Marker colour
    pub color: MarkerColor,
    /// Marker position
    pub position: PercentPoint,
    /// Aggregate stats shown in the info panel
    pub stats: ClusterStats,
}
