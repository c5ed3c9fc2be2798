//! Numeric and formatting helpers shared across crates

/// Clamp a reading into `[0, 100]`; NaN becomes 0
#[must_use]
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truncate toward zero at two decimal places
#[must_use]
pub fn trunc2(value: f64) -> f64 {
    (value * 100.0).trunc() / 100.0
}

/// Format a number without a trailing `.0` for whole values
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format whole dollars with thousands separators, e.g. `$24,500`
#[must_use]
pub fn format_dollars(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_percentage() {
        assert_eq!(clamp_percentage(150.0), 100.0);
        assert_eq!(clamp_percentage(-20.0), 0.0);
        assert_eq!(clamp_percentage(42.5), 42.5);
        assert_eq!(clamp_percentage(f64::NAN), 0.0);
        assert_eq!(clamp_percentage(f64::INFINITY), 100.0);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round2(71.236), 71.24);
        assert_eq!(trunc2(0.999), 0.99);
        assert_eq!(trunc2(-0.999), -0.99);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(72.0), "72");
        assert_eq!(format_number(71.25), "71.25");
        assert_eq!(format_number(71.5), "71.5");
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(0), "$0");
        assert_eq!(format_dollars(999), "$999");
        assert_eq!(format_dollars(6_500), "$6,500");
        assert_eq!(format_dollars(24_500), "$24,500");
        assert_eq!(format_dollars(1_234_567), "$1,234,567");
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_in_range(value in proptest::num::f64::ANY) {
            let clamped = clamp_percentage(value);
            prop_assert!((0.0..=100.0).contains(&clamped));
        }
    }
}
