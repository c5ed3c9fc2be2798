//! Home health certificate

use ambient_core::utils::clamp_percentage;
use ambient_core::{HvacSystem, SystemId};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Overall letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    /// Heating power above 90%
    A,
    /// Above 70%
    B,
    /// Above 50%
    C,
    /// Anything lower
    D,
}

impl Grade {
    /// Grade for a heating-power reading
    pub fn from_heating(value: f64) -> Self {
        if value > 90.0 {
            Self::A
        } else if value > 70.0 {
            Self::B
        } else if value > 50.0 {
            Self::C
        } else {
            Self::D
        }
    }

    /// Display colour
    pub const fn color(self) -> &'static str {
        match self {
            Self::A => "#22c55e",
            Self::B => "#3b82f6",
            Self::C | Self::D => "#f59e0b",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(letter)
    }
}

/// A certificate for one system
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certificate {
    /// System id
    pub system_id: SystemId,
    /// Property address
    pub address: String,
    /// Homeowner
    pub owner_name: String,
    /// Overall grade
    pub grade: Grade,
    /// Heating health in percent of original capacity
    pub heating_percent: f64,
    /// Remaining service life estimate in years
    pub projected_life_years: u32,
    /// Airflow quality label
    pub airflow: String,
    /// Efficiency reading with unit
    pub efficiency: String,
    /// Date of issue
    pub generated_on: NaiveDate,
}

impl Certificate {
    /// Issue a certificate as of `today` for equipment expected to last
    /// `service_life_years`
    pub fn issue(system: &HvacSystem, service_life_years: u32, today: NaiveDate) -> Self {
        let heating_percent =
            clamp_percentage(system.metrics.heating_power.value.as_number().unwrap_or(0.0));
        Self {
            system_id: system.id.clone(),
            address: system.address.clone(),
            owner_name: system.owner_name.clone(),
            grade: Grade::from_heating(heating_percent),
            heating_percent,
            projected_life_years: service_life_years.saturating_sub(system.age_years(today)),
            airflow: system.metrics.system_breathing.display_value(),
            efficiency: system.metrics.efficiency.display_value(),
            generated_on: today,
        }
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Home Health Certificate")?;
        writeln!(f, "Property:        {} ({})", self.address, self.owner_name)?;
        writeln!(f, "Overall grade:   {}", self.grade)?;
        writeln!(f, "Heating health:  {}% of original capacity", self.heating_percent)?;
        writeln!(f, "Projected life:  {} years remaining", self.projected_life_years)?;
        writeln!(f, "Airflow quality: {}", self.airflow)?;
        writeln!(f, "Efficiency:      {}", self.efficiency)?;
        write!(f, "Generated {}", self.generated_on.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ambient_core::Catalog;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(98.0, Grade::A)]
    #[case(90.0, Grade::B)]
    #[case(72.0, Grade::B)]
    #[case(70.0, Grade::C)]
    #[case(50.5, Grade::C)]
    #[case(50.0, Grade::D)]
    #[case(0.0, Grade::D)]
    fn test_grade_boundaries(#[case] value: f64, #[case] expected: Grade) {
        assert_eq!(Grade::from_heating(value), expected);
    }

    #[test]
    fn test_grade_colors() {
        assert_eq!(Grade::A.color(), "#22c55e");
        assert_eq!(Grade::B.color(), "#3b82f6");
        assert_eq!(Grade::C.color(), Grade::D.color());
    }

    #[test]
    fn test_issue_for_aging_system() {
        let catalog = Catalog::seed();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let cert = Certificate::issue(catalog.system("sys_001").unwrap(), 15, today);

        assert_eq!(cert.grade, Grade::B);
        assert_eq!(cert.projected_life_years, 1);
        assert_eq!(cert.airflow, "Restricted");
        assert_eq!(cert.efficiency, "85%");
        assert!(cert.to_string().contains("Overall grade:   B"));
    }

    #[test]
    fn test_projected_life_never_negative() {
        let catalog = Catalog::seed();
        let today = NaiveDate::from_ymd_opt(2040, 1, 1).unwrap();
        let cert = Certificate::issue(catalog.system("sys_001").unwrap(), 15, today);
        assert_eq!(cert.projected_life_years, 0);
    }
}
