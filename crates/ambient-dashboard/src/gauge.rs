//! Radial metric gauge
//!
//! Pure mapping from a reading and a health status to a circular progress
//! indicator. The gauge clamps its input itself, so out-of-range or `NaN`
//! readings render as an empty or full ring rather than a broken one.

use ambient_core::HealthStatus;
use ambient_core::utils::{clamp_percentage, format_number};
use std::f64::consts::PI;

/// Ring radius in viewBox units
pub const RADIUS: f64 = 42.0;

/// Stroke width of track and progress ring
pub const STROKE_WIDTH: f64 = 10.0;

/// Transition applied when the value changes
pub const TRANSITION: &str = "stroke-dashoffset 1.5s cubic-bezier(0.4, 0, 0.2, 1)";

/// Stroke and glow colour for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPalette {
    /// Ring colour
    pub stroke: &'static str,
    /// Drop-shadow colour
    pub glow: &'static str,
}

impl StatusPalette {
    /// Palette for a health status
    pub const fn for_status(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Good => Self {
                stroke: "#10b981",
                glow: "rgba(16, 185, 129, 0.4)",
            },
            HealthStatus::Warning => Self {
                stroke: "#f59e0b",
                glow: "rgba(245, 158, 11, 0.4)",
            },
            HealthStatus::Critical => Self {
                stroke: "#ef4444",
                glow: "rgba(239, 68, 68, 0.4)",
            },
        }
    }
}

/// Fill fraction of a reading, always within [0, 1]
pub fn fill_fraction(value: f64) -> f64 {
    clamp_percentage(value) / 100.0
}

/// Ring circumference
pub fn circumference() -> f64 {
    2.0 * PI * RADIUS
}

/// A rendered gauge
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGauge {
    value: f64,
    label: String,
    status: HealthStatus,
}

impl RadialGauge {
    /// Create a gauge, clamping `value` to [0, 100]
    pub fn new(value: f64, label: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            value: clamp_percentage(value),
            label: label.into(),
            status,
        }
    }

    /// Clamped reading
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Caption under the ring
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Status driving the colour
    pub const fn status(&self) -> HealthStatus {
        self.status
    }

    /// Fill fraction in [0, 1]
    pub fn fill(&self) -> f64 {
        self.value / 100.0
    }

    /// Ring colours
    pub const fn palette(&self) -> StatusPalette {
        StatusPalette::for_status(self.status)
    }

    /// Stroke dash offset of the progress ring
    pub fn dash_offset(&self) -> f64 {
        circumference() * (1.0 - self.fill())
    }

    /// Centre text, e.g. `98%`
    pub fn percent_label(&self) -> String {
        format!("{}%", format_number(self.value))
    }

    /// SVG markup of the ring
    pub fn to_svg(&self) -> String {
        let palette = self.palette();
        let circumference = circumference();
        format!(
            concat!(
                r#"<svg viewBox="0 0 100 100" role="img" aria-label="{label}: {percent}">"#,
                r#"<circle r="{r}" cx="50" cy="50" fill="transparent" stroke="currentColor" stroke-width="{w}" opacity="0.03"/>"#,
                r#"<circle r="{r}" cx="50" cy="50" fill="transparent" stroke="{stroke}" stroke-width="{w}" stroke-linecap="round" "#,
                r#"stroke-dasharray="{c:.3}" stroke-dashoffset="{o:.3}" transform="rotate(-90 50 50)" "#,
                r#"style="transition: {transition}; filter: drop-shadow(0 0 8px {glow})"/>"#,
                r#"<text x="50" y="50" text-anchor="middle" dominant-baseline="central">{percent}</text>"#,
                "</svg>"
            ),
            label = self.label,
            percent = self.percent_label(),
            r = RADIUS,
            w = STROKE_WIDTH,
            stroke = palette.stroke,
            c = circumference,
            o = self.dash_offset(),
            transition = TRANSITION,
            glow = palette.glow,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(98.0, 0.98)]
    #[case(150.0, 1.0)]
    #[case(-20.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    fn test_fill_fraction(#[case] value: f64, #[case] expected: f64) {
        assert!((fill_fraction(value) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_palette_by_status() {
        assert_eq!(StatusPalette::for_status(HealthStatus::Good).stroke, "#10b981");
        assert_eq!(StatusPalette::for_status(HealthStatus::Warning).stroke, "#f59e0b");
        assert_eq!(StatusPalette::for_status(HealthStatus::Critical).stroke, "#ef4444");
    }

    #[test]
    fn test_full_and_empty_offsets() {
        let full = RadialGauge::new(150.0, "Heating", HealthStatus::Good);
        assert!(full.dash_offset().abs() < 1e-9);
        assert_eq!(full.percent_label(), "100%");

        let empty = RadialGauge::new(-20.0, "Heating", HealthStatus::Critical);
        assert!((empty.dash_offset() - circumference()).abs() < 1e-9);
        assert_eq!(empty.percent_label(), "0%");
    }

    #[test]
    fn test_svg_markup() {
        let svg = RadialGauge::new(98.0, "Heating Power", HealthStatus::Good).to_svg();
        assert!(svg.contains(r#"r="42""#));
        assert!(svg.contains(r##"stroke="#10b981""##));
        assert!(svg.contains("98%"));
        assert!(svg.contains("1.5s"));
    }

    proptest! {
        #[test]
        fn prop_fill_matches_clamped_value(value in -1000.0f64..1000.0) {
            let gauge = RadialGauge::new(value, "x", HealthStatus::Good);
            let expected = value.clamp(0.0, 100.0) / 100.0;
            prop_assert!((gauge.fill() - expected).abs() < 1e-12);
            prop_assert!((0.0..=1.0).contains(&gauge.fill()));
        }
    }
}
