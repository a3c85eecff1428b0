//! Rounding, probability and percentage helpers shared by every linear
//! instrument.
//!
//! Intermediate values are carried at five decimal places so that results do
//! not depend on how the host represents the unrounded floats.

const FIVE_DECIMALS: f64 = 100_000.0;

/// Lowest percentage any published band table is defined for.
pub const MIN_SANITIZED_PERCENTAGE: u8 = 1;
/// Highest percentage any published band table is defined for.
pub const MAX_SANITIZED_PERCENTAGE: u8 = 99;

/// Rounds half away from zero to five decimal places.
pub fn round_to_5_decimals(value: f64) -> f64 {
    let rounded = (value * FIVE_DECIMALS).round() / FIVE_DECIMALS;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Logistic transform `e^x / (1 + e^x)`, evaluated in the form that cannot
/// overflow for large magnitudes of `x`.
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let ex = x.exp();
        ex / (1.0 + ex)
    }
}

/// Converts a probability into a whole percentage, rounding half up.
pub fn as_percentage(probability: f64) -> i32 {
    let scaled = round_to_5_decimals(probability * 100.0);
    scaled.round() as i32
}

/// Clamps a raw percentage into the `[1, 99]` range band tables cover.
pub fn sanitize_percentage(percentage: i32) -> u8 {
    if percentage <= 0 {
        MIN_SANITIZED_PERCENTAGE
    } else if percentage > i32::from(MAX_SANITIZED_PERCENTAGE) {
        MAX_SANITIZED_PERCENTAGE
    } else {
        u8::try_from(percentage).unwrap_or(MAX_SANITIZED_PERCENTAGE)
    }
}

/// Runs one linear predictor through the probability, percentage and clamp
/// steps, returning the sanitized percentage.
pub fn predictor_to_percentage(linear_predictor: f64) -> u8 {
    let probability = round_to_5_decimals(logistic(round_to_5_decimals(linear_predictor)));
    sanitize_percentage(as_percentage(probability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rounds_to_five_decimal_places() {
        assert_eq!(round_to_5_decimals(1.23456789), 1.23457);
        assert_eq!(round_to_5_decimals(1.23456123), 1.23456);
        assert_eq!(round_to_5_decimals(0.0), 0.0);
        assert_eq!(round_to_5_decimals(-0.000001), 0.0);
        assert_eq!(round_to_5_decimals(-2.345678), -2.34568);
    }

    #[test]
    fn converts_probabilities_to_whole_percentages() {
        assert_eq!(as_percentage(0.5), 50);
        assert_eq!(as_percentage(0.996), 100);
        assert_eq!(as_percentage(1.0), 100);
        assert_eq!(as_percentage(0.004), 0);
        assert_eq!(as_percentage(0.994), 99);
        assert_eq!(as_percentage(0.125), 13);
        assert_eq!(as_percentage(0.49678), 50);
    }

    #[test]
    fn sanitizes_into_band_range() {
        assert_eq!(sanitize_percentage(0), 1);
        assert_eq!(sanitize_percentage(-5), 1);
        assert_eq!(sanitize_percentage(100), 99);
        assert_eq!(sanitize_percentage(121), 99);
        assert_eq!(sanitize_percentage(50), 50);
        assert_eq!(sanitize_percentage(25), 25);
        assert_eq!(sanitize_percentage(1), 1);
        assert_eq!(sanitize_percentage(99), 99);
        assert_eq!(sanitize_percentage(i32::MAX), 99);
    }

    #[test]
    fn logistic_is_symmetric_around_zero() {
        assert_eq!(logistic(0.0), 0.5);
        let high = logistic(2.0);
        let low = logistic(-2.0);
        assert!((high + low - 1.0).abs() < 1e-12);
        assert_eq!(logistic(1_000.0), 1.0);
        assert_eq!(logistic(-1_000.0), 0.0);
    }

    #[test]
    fn predictor_to_percentage_clamps_extremes() {
        assert_eq!(predictor_to_percentage(0.0), 50);
        assert_eq!(predictor_to_percentage(-20.0), 1);
        assert_eq!(predictor_to_percentage(20.0), 99);
    }

    proptest! {
        #[test]
        fn sanitized_percentage_is_always_in_range(raw in -1_000i32..1_000) {
            let sanitized = sanitize_percentage(raw);
            prop_assert!((MIN_SANITIZED_PERCENTAGE..=MAX_SANITIZED_PERCENTAGE).contains(&sanitized));
        }

        #[test]
        fn predictor_percentage_is_monotone(a in -10.0f64..10.0, b in -10.0f64..10.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(predictor_to_percentage(low) <= predictor_to_percentage(high));
        }
    }
}
