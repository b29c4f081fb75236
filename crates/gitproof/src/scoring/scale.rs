//! Normalization primitives mapping raw counts onto the 0-10 score axis.

pub const SCORE_FLOOR: f64 = 0.0;
pub const SCORE_CEILING: f64 = 10.0;

/// Logarithmic scaling for right-skewed counts; diminishing returns past `max_expected`.
pub fn log_scale(value: f64, max_expected: f64) -> f64 {
    if value <= 0.0 {
        return SCORE_FLOOR;
    }
    let scaled = ((value + 1.0).log10() / (max_expected + 1.0).log10()) * 10.0;
    clamp_score(scaled)
}

/// Linear scaling for bounded-growth signals; reaches the ceiling at `max_expected`.
pub fn linear_scale(value: f64, max_expected: f64) -> f64 {
    clamp_score((value / max_expected) * 10.0)
}

pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_FLOOR;
    }
    value.clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
