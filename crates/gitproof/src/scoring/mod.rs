//! Deterministic scoring engine: canonical record in, scoring result out.

pub mod domain;
pub mod grade;
pub mod metrics;
pub mod scale;
pub mod weights;

pub use domain::{
    Activity, CanonicalProfileRecord, Grade, MetricKind, MetricResult, MetricSet,
    ProfileFields, PullRequestStats, RepositorySummary, ScoringResult, TopRepository,
};
pub use metrics::ScoringContext;
pub use weights::{MetricWeights, WeightError, STANDARD_WEIGHTS};

use chrono::{DateTime, Utc};
use tracing::debug;

/// Stateless evaluator applying the weight table to a canonical record.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: MetricWeights,
}

impl ScoringEngine {
    pub fn new(weights: MetricWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    /// Scores the record as of `now`. Identical inputs always produce identical output.
    pub fn score(&self, record: &CanonicalProfileRecord, now: DateTime<Utc>) -> ScoringResult {
        let ctx = ScoringContext::new(record, now);

        let metrics = MetricSet {
            productivity: metrics::productivity(&ctx),
            reliability: metrics::reliability(&ctx),
            impact: metrics::impact(&ctx),
            mastery: metrics::mastery(&ctx),
            endurance: metrics::endurance(&ctx),
        };

        let score = self.weights.aggregate(&metrics);
        let (grade, percentile) = grade::classify(score);

        debug!(
            username = %record.username,
            score,
            %grade,
            percentile,
            "profile scored"
        );

        ScoringResult {
            score,
            grade,
            percentile,
            metrics,
        }
    }
}
