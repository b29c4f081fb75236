//! Threshold ladders mapping the aggregate score to a grade and a percentile.
//!
//! The two ladders are declared independently and evaluated separately; their
//! boundaries intentionally do not line up.

use super::domain::Grade;

/// Lower-inclusive grade thresholds, evaluated top-down.
pub const GRADE_THRESHOLDS: [(f64, Grade); 5] = [
    (9.0, Grade::S),
    (7.5, Grade::A),
    (6.0, Grade::B),
    (4.5, Grade::C),
    (3.0, Grade::D),
];

/// Lower-inclusive percentile thresholds, evaluated top-down.
pub const PERCENTILE_THRESHOLDS: [(f64, u8); 7] = [
    (9.0, 99),
    (8.0, 95),
    (7.0, 85),
    (6.0, 70),
    (5.0, 50),
    (4.0, 30),
    (3.0, 15),
];

pub const FALLBACK_GRADE: Grade = Grade::F;
pub const FALLBACK_PERCENTILE: u8 = 5;

pub fn grade_for(score: f64) -> Grade {
    GRADE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, grade)| *grade)
        .unwrap_or(FALLBACK_GRADE)
}

pub fn percentile_for(score: f64) -> u8 {
    PERCENTILE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, percentile)| *percentile)
        .unwrap_or(FALLBACK_PERCENTILE)
}

pub fn classify(score: f64) -> (Grade, u8) {
    (grade_for(score), percentile_for(score))
}
