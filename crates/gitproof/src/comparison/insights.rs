use crate::analysis::ProfileAnalysis;
use std::cmp::Ordering;

/// Four observations built only from the two profiles' own fields.
pub(super) fn deterministic_insights(
    first: &ProfileAnalysis,
    second: &ProfileAnalysis,
) -> Vec<String> {
    vec![
        impact_insight(first, second),
        following_insight(first, second),
        stars_insight(first, second),
        strengths_insight(first, second),
    ]
}

fn impact_insight(first: &ProfileAnalysis, second: &ProfileAnalysis) -> String {
    let a = first.scoring.metrics.impact.value;
    let b = second.scoring.metrics.impact.value;
    match a.partial_cmp(&b).unwrap_or(Ordering::Equal) {
        Ordering::Greater => format!(
            "{} has the higher impact score ({a} vs {b}).",
            first.full_name
        ),
        Ordering::Less => format!(
            "{} has the higher impact score ({b} vs {a}).",
            second.full_name
        ),
        Ordering::Equal => format!("Both developers share an impact score of {a}."),
    }
}

fn following_insight(first: &ProfileAnalysis, second: &ProfileAnalysis) -> String {
    match first.followers.cmp(&second.followers) {
        Ordering::Greater => format!(
            "{} has a larger following ({} vs {} followers).",
            first.full_name, first.followers, second.followers
        ),
        Ordering::Less => format!(
            "{} has a larger following ({} vs {} followers).",
            second.full_name, second.followers, first.followers
        ),
        Ordering::Equal => format!("Both developers have {} followers.", first.followers),
    }
}

fn stars_insight(first: &ProfileAnalysis, second: &ProfileAnalysis) -> String {
    match first.total_stars.cmp(&second.total_stars) {
        Ordering::Greater => format!(
            "{} has earned more stars ({} vs {}).",
            first.full_name, first.total_stars, second.total_stars
        ),
        Ordering::Less => format!(
            "{} has earned more stars ({} vs {}).",
            second.full_name, second.total_stars, first.total_stars
        ),
        Ordering::Equal => format!(
            "Both developers have earned {} stars.",
            first.total_stars
        ),
    }
}

fn strengths_insight(first: &ProfileAnalysis, second: &ProfileAnalysis) -> String {
    let a = first.strongest_metric();
    let b = second.strongest_metric();
    format!(
        "{} is strongest in {} ({}); {} is strongest in {} ({}).",
        first.full_name, a.kind, a.value, second.full_name, b.kind, b.value
    )
}
