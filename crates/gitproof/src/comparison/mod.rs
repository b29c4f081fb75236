//! Head-to-head comparison of two analysed profiles.
//!
//! The winner always comes from the aggregate scores. Enrichment may only
//! rewrite the narrative around that decision.

mod insights;

use crate::analysis::ProfileAnalysis;
use crate::enrichment::{self, prompts, EnrichmentContext, EnrichmentKind, TextEnricher, TextSource};
use crate::scoring::scale::round_to;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Decisive,
    /// Equal scores; the first profile is reported as the highlighted one.
    Tie,
}

/// Headline, reasoning, and insight text accompanying a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonNarrative {
    pub headline: String,
    pub reasoning: String,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub first_username: String,
    pub second_username: String,
    pub winner_username: String,
    pub outcome: ComparisonOutcome,
    pub score_delta: f64,
    pub headline: String,
    pub reasoning: String,
    pub insights: Vec<String>,
    pub text_source: TextSource,
}

impl ComparisonResult {
    pub fn is_tie(&self) -> bool {
        self.outcome == ComparisonOutcome::Tie
    }

    fn apply(&mut self, narrative: ComparisonNarrative, source: TextSource) {
        self.headline = narrative.headline;
        self.reasoning = narrative.reasoning;
        self.insights = narrative.insights;
        self.text_source = source;
    }
}

struct Standing<'a> {
    winner: &'a ProfileAnalysis,
    runner_up: &'a ProfileAnalysis,
    outcome: ComparisonOutcome,
    delta: f64,
}

fn standing<'a>(first: &'a ProfileAnalysis, second: &'a ProfileAnalysis) -> Standing<'a> {
    let first_score = first.scoring.score;
    let second_score = second.scoring.score;
    let delta = round_to((first_score - second_score).abs(), 2);

    if second_score > first_score {
        Standing {
            winner: second,
            runner_up: first,
            outcome: ComparisonOutcome::Decisive,
            delta,
        }
    } else {
        let outcome = if first_score > second_score {
            ComparisonOutcome::Decisive
        } else {
            ComparisonOutcome::Tie
        };
        Standing {
            winner: first,
            runner_up: second,
            outcome,
            delta,
        }
    }
}

/// Deterministic comparison; ties highlight the first argument.
pub fn compare(first: &ProfileAnalysis, second: &ProfileAnalysis) -> ComparisonResult {
    let standing = standing(first, second);
    let narrative = deterministic_narrative(&standing, first, second);

    ComparisonResult {
        first_username: first.username.clone(),
        second_username: second.username.clone(),
        winner_username: standing.winner.username.clone(),
        outcome: standing.outcome,
        score_delta: standing.delta,
        headline: narrative.headline,
        reasoning: narrative.reasoning,
        insights: narrative.insights,
        text_source: TextSource::Deterministic,
    }
}

/// Deterministic comparison with provider-written narrative when available.
pub async fn compare_with_enrichment<E>(
    first: &ProfileAnalysis,
    second: &ProfileAnalysis,
    enricher: &E,
    timeout: Duration,
) -> ComparisonResult
where
    E: TextEnricher,
{
    let mut result = compare(first, second);
    let context = EnrichmentContext {
        kind: EnrichmentKind::Comparison,
        prompt: prompts::comparison_prompt(first, second),
    };

    let outcome = enrichment::enrich(enricher, &context, timeout)
        .await
        .and_then(|raw| prompts::parse_comparison(&raw));

    match outcome {
        Ok(narrative) => {
            debug!(
                first = %result.first_username,
                second = %result.second_username,
                winner = %result.winner_username,
                "comparison narrative enriched"
            );
            result.apply(narrative, TextSource::Enriched);
        }
        Err(err) => {
            warn!(
                first = %result.first_username,
                second = %result.second_username,
                error = %err,
                "comparison enrichment failed; keeping deterministic narrative"
            );
        }
    }

    result
}

fn deterministic_narrative(
    standing: &Standing<'_>,
    first: &ProfileAnalysis,
    second: &ProfileAnalysis,
) -> ComparisonNarrative {
    let winner = standing.winner;
    let runner_up = standing.runner_up;

    let (headline, reasoning) = match standing.outcome {
        ComparisonOutcome::Decisive => (
            format!(
                "{} is the stronger developer based on available metrics.",
                winner.full_name
            ),
            format!(
                "{} has a higher overall score ({}) compared to {} ({}), a margin of {:.2} points.",
                winner.full_name,
                winner.scoring.score,
                runner_up.full_name,
                runner_up.scoring.score,
                standing.delta
            ),
        ),
        ComparisonOutcome::Tie => (
            format!(
                "{} and {} are evenly matched.",
                first.full_name, second.full_name
            ),
            format!(
                "{} and {} share an overall score of {} (a margin of {:.2} points), so {} is listed first.",
                first.full_name,
                second.full_name,
                first.scoring.score,
                standing.delta,
                first.full_name
            ),
        ),
    };

    ComparisonNarrative {
        headline,
        reasoning,
        insights: insights::deterministic_insights(first, second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::{EnrichmentError, NoopEnricher};
    use crate::scoring::{grade, CanonicalProfileRecord, MetricKind, MetricResult, MetricSet, ScoringResult};
    use chrono::{DateTime, Utc};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn metric(kind: MetricKind, value: f64) -> MetricResult {
        MetricResult {
            kind,
            label: kind.label().to_string(),
            value,
            description: kind.description().to_string(),
            rationale: String::new(),
        }
    }

    fn analysis(username: &str, name: &str, score: f64, impact: f64, followers: u64) -> ProfileAnalysis {
        let mut record = CanonicalProfileRecord::new(username, now());
        record.profile.name = Some(name.to_string());
        record.followers = followers;
        record.total_stars = followers * 2;

        let (grade, percentile) = grade::classify(score);
        let scoring = ScoringResult {
            score,
            grade,
            percentile,
            metrics: MetricSet {
                productivity: metric(MetricKind::Productivity, 6.0),
                reliability: metric(MetricKind::Reliability, 5.0),
                impact: metric(MetricKind::Impact, impact),
                mastery: metric(MetricKind::Mastery, 4.0),
                endurance: metric(MetricKind::Endurance, 3.0),
            },
        };
        ProfileAnalysis::assemble(record, scoring, now())
    }

    struct FailingEnricher;

    impl TextEnricher for FailingEnricher {
        async fn summarize(&self, _context: &EnrichmentContext) -> Result<String, EnrichmentError> {
            Err(EnrichmentError::Unavailable("quota exhausted".to_string()))
        }
    }

    #[test]
    fn higher_score_wins_regardless_of_argument_order() {
        let alice = analysis("alice", "Alice", 8.2, 9.0, 900);
        let bob = analysis("bob", "Bob", 6.5, 5.5, 100);

        let forward = compare(&alice, &bob);
        let reverse = compare(&bob, &alice);

        assert_eq!(forward.winner_username, "alice");
        assert_eq!(reverse.winner_username, "alice");
        assert_eq!(forward.outcome, ComparisonOutcome::Decisive);
        assert_eq!(forward.score_delta, 1.7);
        assert_eq!(
            forward.headline,
            "Alice is the stronger developer based on available metrics."
        );
        assert_eq!(
            forward.reasoning,
            "Alice has a higher overall score (8.2) compared to Bob (6.5), a margin of 1.70 points."
        );
        assert_eq!(forward.text_source, TextSource::Deterministic);
    }

    #[test]
    fn insights_are_derived_from_both_profiles() {
        let alice = analysis("alice", "Alice", 8.2, 9.0, 900);
        let bob = analysis("bob", "Bob", 6.5, 5.5, 100);

        let result = compare(&alice, &bob);

        assert_eq!(
            result.insights,
            vec![
                "Alice has the higher impact score (9 vs 5.5).".to_string(),
                "Alice has a larger following (900 vs 100 followers).".to_string(),
                "Alice has earned more stars (1800 vs 200).".to_string(),
                "Alice is strongest in impact (9); Bob is strongest in productivity (6).".to_string(),
            ]
        );
    }

    #[test]
    fn equal_scores_are_a_tie_favouring_first_argument() {
        let carol = analysis("carol", "Carol", 7.0, 6.0, 50);
        let dave = analysis("dave", "Dave", 7.0, 6.0, 50);

        let result = compare(&carol, &dave);

        assert!(result.is_tie());
        assert_eq!(result.winner_username, "carol");
        assert_eq!(result.score_delta, 0.0);
        assert_eq!(result.headline, "Carol and Dave are evenly matched.");
        assert_eq!(result.insights[0], "Both developers share an impact score of 6.");
        assert_eq!(result.insights[1], "Both developers have 50 followers.");

        let swapped = compare(&dave, &carol);
        assert_eq!(swapped.winner_username, "dave");
    }

    #[tokio::test]
    async fn enrichment_failure_keeps_deterministic_narrative() {
        let alice = analysis("alice", "Alice", 8.2, 9.0, 900);
        let bob = analysis("bob", "Bob", 6.5, 5.5, 100);
        let expected = compare(&alice, &bob);

        let failing =
            compare_with_enrichment(&alice, &bob, &FailingEnricher, Duration::from_secs(1)).await;
        let offline =
            compare_with_enrichment(&alice, &bob, &NoopEnricher, Duration::from_secs(1)).await;

        assert_eq!(failing, expected);
        assert_eq!(offline, expected);
    }
}
