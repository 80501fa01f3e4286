//! Heading arithmetic.
//!
//! Element headings come straight out of `atan2` plus tangent offsets, so
//! they live anywhere in roughly `(-3π/2, 3π/2]`. These helpers fold them
//! into canonical ranges and measure how far apart two headings are for the
//! continuity search.

use std::f64::consts::{PI, TAU};

/// Fold an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_positive(angle: f64) -> f64 {
    let folded = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if folded >= TAU { 0.0 } else { folded }
}

/// Heading pointing the opposite way, folded into `(-π, π]`.
///
/// Expects a heading in `(-π, π]`, as produced by `atan2`.
#[must_use]
pub fn opposite(angle: f64) -> f64 {
    let flipped = angle + PI;
    if flipped > PI { flipped - TAU } else { flipped }
}

/// Angular distance used by the continuity search.
///
/// The smaller of the raw difference and the difference after folding both
/// headings into `[0, 2π)`.
#[must_use]
pub fn continuity_distance(a: f64, b: f64) -> f64 {
    let raw = (a - b).abs();
    let folded = (normalize_positive(a) - normalize_positive(b)).abs();
    raw.min(folded)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}",
        );
    }

    #[test]
    fn normalize_positive_folds_negative_angles() {
        assert_close(normalize_positive(-FRAC_PI_2), 3.0 * FRAC_PI_2);
        assert_close(normalize_positive(0.0), 0.0);
        assert_close(normalize_positive(TAU), 0.0);
        assert_close(normalize_positive(5.0 * PI), PI);
    }

    #[test]
    fn normalize_positive_stays_below_tau() {
        let folded = normalize_positive(-1e-18);
        assert!((0.0..TAU).contains(&folded));
    }

    #[test]
    fn opposite_stays_in_half_open_range() {
        assert_close(opposite(0.0), PI);
        assert_close(opposite(FRAC_PI_2), -FRAC_PI_2);
        assert_close(opposite(-FRAC_PI_2), FRAC_PI_2);
        assert_close(opposite(PI), 0.0);
    }

    #[test]
    fn continuity_distance_raw_difference() {
        assert_close(continuity_distance(0.1, 0.3), 0.2);
    }

    #[test]
    fn continuity_distance_handles_atan2_wraparound() {
        // -π/2 and 3π/2 are the same heading reached from different ranges.
        assert_close(continuity_distance(-FRAC_PI_2, 3.0 * FRAC_PI_2), 0.0);
        // Just below π versus just above -π (folded to just above π).
        assert_close(continuity_distance(PI - 0.05, -PI + 0.05), 0.1);
    }

    #[test]
    fn continuity_distance_is_symmetric() {
        let pairs = [(0.2, 2.9), (-1.0, 4.0), (PI, -PI)];
        for (a, b) in pairs {
            assert_close(continuity_distance(a, b), continuity_distance(b, a));
        }
    }
}
