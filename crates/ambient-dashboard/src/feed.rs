//! Main feed: bucket classification and card view models
//!
//! Every system lands in exactly one bucket. A system with any urgent
//! insight is a lead; otherwise any insight at all makes it automated
//! triage; a system without insights is standard.

use crate::gauge::RadialGauge;
use crate::spotlight::SpotlightCard;
use ambient_core::utils::clamp_percentage;
use ambient_core::{HvacSystem, SystemId};
use chrono::NaiveDate;
use serde::Serialize;

/// Age at which a lead card warns about end of life
pub const END_OF_LIFE_YEARS: u32 = 10;

/// Feed bucket of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// At least one urgent insight
    Lead,
    /// Only non-urgent insights
    Nuisance,
    /// No insights
    Standard,
}

impl Bucket {
    /// Classify a system
    pub fn classify(system: &HvacSystem) -> Self {
        if system.has_urgent_insight() {
            Self::Lead
        } else if !system.insights.is_empty() {
            Self::Nuisance
        } else {
            Self::Standard
        }
    }

    /// Section heading
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Lead => "High-Value Leads",
            Self::Nuisance => "Automated Triage",
            Self::Standard => "All Systems",
        }
    }
}

/// Systems split into the three buckets, seed order preserved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBuckets<'a> {
    /// Urgent leads
    pub leads: Vec<&'a HvacSystem>,
    /// Automated triage
    pub nuisance: Vec<&'a HvacSystem>,
    /// Everything else
    pub standard: Vec<&'a HvacSystem>,
}

impl<'a> FeedBuckets<'a> {
    /// Partition `systems`
    pub fn from_systems(systems: &'a [HvacSystem]) -> Self {
        let mut buckets = Self::default();
        for system in systems {
            match Bucket::classify(system) {
                Bucket::Lead => buckets.leads.push(system),
                Bucket::Nuisance => buckets.nuisance.push(system),
                Bucket::Standard => buckets.standard.push(system),
            }
        }
        buckets
    }

    /// Systems in one bucket
    pub fn get(&self, bucket: Bucket) -> &[&'a HvacSystem] {
        match bucket {
            Bucket::Lead => &self.leads,
            Bucket::Nuisance => &self.nuisance,
            Bucket::Standard => &self.standard,
        }
    }

    /// Total number of systems
    pub fn len(&self) -> usize {
        self.leads.len() + self.nuisance.len() + self.standard.len()
    }

    /// Whether there are no systems at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Card of a lead system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadCard {
    /// System id
    pub system_id: SystemId,
    /// Street address
    pub address: String,
    /// Homeowner
    pub owner_name: String,
    /// Value proposition of the first urgent insight
    pub badge: Option<String>,
    /// Heating bar fill in percent
    pub heating_percent: f64,
    /// Whole years since install
    pub age_years: u32,
    /// Old enough to warn about replacement
    pub end_of_life: bool,
}

/// Card of an automated-triage system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NuisanceCard {
    /// System id
    pub system_id: SystemId,
    /// Street address
    pub address: String,
    /// Title of the first insight
    pub title: String,
    /// Description of the first insight
    pub description: String,
    /// Heating reading in percent
    pub heating_percent: f64,
    /// Operator hint
    pub hint: &'static str,
}

/// Card of a standard system
#[derive(Debug, Clone, PartialEq)]
pub struct StandardCard {
    /// System id
    pub system_id: SystemId,
    /// Street address
    pub address: String,
    /// Heating-power gauge
    pub gauge: RadialGauge,
    /// Airflow reading
    pub breathing: String,
}

/// A feed card
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    /// Lead card
    Lead(LeadCard),
    /// Automated-triage card
    Nuisance(NuisanceCard),
    /// Standard card
    Standard(StandardCard),
}

fn heating_percent(system: &HvacSystem) -> f64 {
    clamp_percentage(system.metrics.heating_power.value.as_number().unwrap_or(0.0))
}

impl Card {
    /// Build the card for `system` as of `today`
    pub fn for_system(system: &HvacSystem, today: NaiveDate) -> Self {
        match Bucket::classify(system) {
            Bucket::Lead => {
                let age_years = system.age_years(today);
                Self::Lead(LeadCard {
                    system_id: system.id.clone(),
                    address: system.address.clone(),
                    owner_name: system.owner_name.clone(),
                    badge: system
                        .first_urgent_insight()
                        .and_then(|insight| insight.value_prop.clone()),
                    heating_percent: heating_percent(system),
                    age_years,
                    end_of_life: age_years >= END_OF_LIFE_YEARS,
                })
            }
            Bucket::Nuisance => {
                let (title, description) = system
                    .insights
                    .first()
                    .map(|insight| (insight.title.clone(), insight.description.clone()))
                    .unwrap_or_default();
                Self::Nuisance(NuisanceCard {
                    system_id: system.id.clone(),
                    address: system.address.clone(),
                    title,
                    description,
                    heating_percent: heating_percent(system),
                    hint: "Dry Run?",
                })
            }
            Bucket::Standard => {
                let heating = &system.metrics.heating_power;
                Self::Standard(StandardCard {
                    system_id: system.id.clone(),
                    address: system.address.clone(),
                    gauge: RadialGauge::new(
                        heating.value.as_number().unwrap_or(0.0),
                        heating.label.clone(),
                        heating.status,
                    ),
                    breathing: system.metrics.system_breathing.display_value(),
                })
            }
        }
    }

    /// Bucket the card belongs to
    pub const fn bucket(&self) -> Bucket {
        match self {
            Self::Lead(_) => Bucket::Lead,
            Self::Nuisance(_) => Bucket::Nuisance,
            Self::Standard(_) => Bucket::Standard,
        }
    }

    /// System the card opens
    pub fn system_id(&self) -> &str {
        match self {
            Self::Lead(card) => &card.system_id,
            Self::Nuisance(card) => &card.system_id,
            Self::Standard(card) => &card.system_id,
        }
    }

    fn address(&self) -> &str {
        match self {
            Self::Lead(card) => &card.address,
            Self::Nuisance(card) => &card.address,
            Self::Standard(card) => &card.address,
        }
    }

    /// Whether the card gets the gold urgent treatment
    pub const fn is_urgent(&self) -> bool {
        matches!(self, Self::Lead(_))
    }

    /// Card shell; the caller attaches the activation handler
    pub fn shell<'h>(&self) -> SpotlightCard<'h> {
        SpotlightCard::new()
            .urgent(self.is_urgent())
            .aria_label(format!("Open details for {}", self.address()))
            .opens_dialog(true)
    }
}

/// Cards for every system, leads first, then triage, then standard
pub fn feed_cards(systems: &[HvacSystem], today: NaiveDate) -> Vec<Card> {
    let buckets = FeedBuckets::from_systems(systems);
    [Bucket::Lead, Bucket::Nuisance, Bucket::Standard]
        .into_iter()
        .flat_map(|bucket| buckets.get(bucket).to_vec())
        .map(|system| Card::for_system(system, today))
        .collect()
}
