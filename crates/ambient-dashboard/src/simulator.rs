//! Stochastic metric simulator
//!
//! Stands in for real telemetry ingestion. Each step nudges a numeric
//! reading by a bounded random amount and occasionally flips its trend
//! arrow. The random source is injected so runs can be reproduced.

use ambient_core::config::TelemetryConfig;
use ambient_core::types::{Metric, MetricValue, Trend};
use ambient_core::utils::{clamp_percentage, round2, trunc2};
use ambient_core::{HealthStatus, Thresholds};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest useful jitter bound; wider steps are clamped to the scale anyway
const MAX_JITTER_BOUND: f64 = 200.0;

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Reading before the step
    pub previous: f64,
    /// Reading after the step
    pub value: f64,
    /// Status after the step
    pub status: HealthStatus,
    /// Trend after the step
    pub trend: Option<Trend>,
    /// Whether the trend arrow changed
    pub trend_flipped: bool,
}

/// Bounded random walk over a percentage reading
#[derive(Debug)]
pub struct MetricSimulator<R> {
    rng: R,
    jitter_bound: f64,
    flip_probability: f64,
    thresholds: Option<Thresholds>,
}

impl MetricSimulator<StdRng> {
    /// Simulator over a fixed seed
    pub fn seeded(seed: u64, settings: &TelemetryConfig, thresholds: Option<Thresholds>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), settings, thresholds)
    }

    /// Simulator seeded from `settings.seed`, or from entropy when unset
    pub fn from_settings(settings: &TelemetryConfig, thresholds: Option<Thresholds>) -> Self {
        let rng = settings
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::new(rng, settings, thresholds)
    }
}

impl<R: Rng> MetricSimulator<R> {
    /// Simulator over any random source
    ///
    /// `thresholds`, when given, are used to recompute the status after
    /// every step. A non-finite or negative jitter bound disables jitter and
    /// a NaN flip probability disables flipping.
    pub fn new(rng: R, settings: &TelemetryConfig, thresholds: Option<Thresholds>) -> Self {
        let jitter_bound = if settings.jitter_bound.is_finite() {
            settings.jitter_bound.clamp(0.0, MAX_JITTER_BOUND)
        } else {
            0.0
        };
        let flip_probability = if settings.trend_flip_probability.is_nan() {
            0.0
        } else {
            settings.trend_flip_probability.clamp(0.0, 1.0)
        };
        Self {
            rng,
            jitter_bound,
            flip_probability,
            thresholds,
        }
    }

    /// Jitter bound δ; a step moves the reading by at most δ/2
    pub const fn jitter_bound(&self) -> f64 {
        self.jitter_bound
    }

    /// Next reading after `previous`
    pub fn next_value(&mut self, previous: f64) -> f64 {
        let half = self.jitter_bound / 2.0;
        let jitter = if half > 0.0 {
            trunc2(self.rng.gen_range(-half..=half))
        } else {
            0.0
        };
        round2(clamp_percentage(previous + jitter))
    }

    /// Advance a metric in place
    ///
    /// Non-numeric readings are left untouched and yield `None`.
    pub fn step(&mut self, metric: &mut Metric) -> Option<Step> {
        let previous = metric.value.as_number()?;
        let value = self.next_value(previous);

        let trend_flipped = self.rng.gen_bool(self.flip_probability);
        if trend_flipped {
            metric.trend = Some(flip(metric.trend, previous, value));
        }

        metric.value = MetricValue::Number(value);
        if let Some(thresholds) = self.thresholds {
            metric.status = thresholds.classify(value);
        }

        Some(Step {
            previous,
            value,
            status: metric.status,
            trend: metric.trend,
            trend_flipped,
        })
    }
}

fn flip(trend: Option<Trend>, previous: f64, value: f64) -> Trend {
    match trend {
        Some(Trend::Up) => Trend::Down,
        Some(Trend::Down) => Trend::Up,
        Some(Trend::Stable) | None => {
            if value > previous {
                Trend::Up
            } else if value < previous {
                Trend::Down
            } else {
                Trend::Stable
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ambient_core::{Catalog, MetricThresholds, MetricKind};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;

    fn heating() -> Metric {
        Catalog::seed().system("sys_001").unwrap().metrics.heating_power.clone()
    }

    fn settings(jitter_bound: f64, trend_flip_probability: f64) -> TelemetryConfig {
        TelemetryConfig {
            jitter_bound,
            trend_flip_probability,
            ..TelemetryConfig::default()
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let thresholds = MetricThresholds::default().for_kind(MetricKind::HeatingPower);
        let mut a = MetricSimulator::seeded(7, &TelemetryConfig::default(), thresholds);
        let mut b = MetricSimulator::seeded(7, &TelemetryConfig::default(), thresholds);
        let (mut ma, mut mb) = (heating(), heating());
        for _ in 0..50 {
            assert_eq!(a.step(&mut ma), b.step(&mut mb));
        }
        assert_eq!(ma, mb);
    }

    #[test]
    fn test_status_recomputed_from_thresholds() {
        let thresholds = MetricThresholds::default().for_kind(MetricKind::HeatingPower);
        let mut sim = MetricSimulator::seeded(1, &settings(0.0, 0.0), thresholds);
        let mut metric = heating();
        metric.value = MetricValue::Number(95.0);

        let step = sim.step(&mut metric).unwrap();
        assert_eq!(step.value, 95.0);
        assert_eq!(metric.status, HealthStatus::Good);
    }

    #[test]
    fn test_label_values_are_skipped() {
        let mut sim = MetricSimulator::seeded(1, &TelemetryConfig::default(), None);
        let mut breathing = Catalog::seed().system("sys_001").unwrap().metrics.system_breathing.clone();
        let before = breathing.clone();
        assert!(sim.step(&mut breathing).is_none());
        assert_eq!(breathing, before);
    }

    #[test]
    fn test_certain_flip_reverses_trend() {
        let mut sim = MetricSimulator::seeded(3, &settings(2.0, 1.0), None);
        let mut metric = heating();
        assert_eq!(metric.trend, Some(Trend::Down));

        let step = sim.step(&mut metric).unwrap();
        assert!(step.trend_flipped);
        assert_eq!(metric.trend, Some(Trend::Up));
    }

    #[test]
    fn test_flip_from_stable_follows_movement() {
        assert_eq!(flip(Some(Trend::Stable), 50.0, 50.4), Trend::Up);
        assert_eq!(flip(None, 50.0, 49.9), Trend::Down);
        assert_eq!(flip(None, 50.0, 50.0), Trend::Stable);
    }

    #[test]
    fn test_clamps_at_bounds() {
        // StepRng(0, 0) yields the low end of every range
        let mut sim = MetricSimulator::new(StepRng::new(0, 0), &settings(2.0, 0.0), None);
        assert_eq!(sim.next_value(0.5), 0.0);
        assert_eq!(sim.next_value(0.0), 0.0);
    }

    #[test]
    fn test_unusable_settings_do_not_panic() {
        for (delta, probability) in [
            (f64::INFINITY, f64::NAN),
            (f64::NAN, 0.5),
            (f64::MAX, f64::INFINITY),
            (-3.0, f64::NEG_INFINITY),
        ] {
            let mut sim = MetricSimulator::seeded(11, &settings(delta, probability), None);
            let mut metric = heating();
            for _ in 0..20 {
                let step = sim.step(&mut metric).unwrap();
                assert!((0.0..=100.0).contains(&step.value));
            }
        }

        let sim = MetricSimulator::seeded(1, &settings(f64::INFINITY, 0.0), None);
        assert_eq!(sim.jitter_bound(), 0.0);
        let sim = MetricSimulator::seeded(1, &settings(f64::MAX, 0.0), None);
        assert_eq!(sim.jitter_bound(), MAX_JITTER_BOUND);
    }

    proptest! {
        #[test]
        fn prop_ticks_stay_bounded(
            seed in any::<u64>(),
            start in 0.0f64..=100.0,
            delta in 0.0f64..20.0,
            ticks in 1usize..200,
        ) {
            let mut sim = MetricSimulator::seeded(seed, &settings(delta, 0.1), None);
            let mut previous = round2(start);
            for _ in 0..ticks {
                let next = sim.next_value(previous);
                prop_assert!((0.0..=100.0).contains(&next));
                prop_assert!((next - previous).abs() <= delta / 2.0 + 1e-9);
                previous = next;
            }
        }
    }
}
