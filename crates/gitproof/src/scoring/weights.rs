use super::domain::{MetricKind, MetricSet};
use super::scale::round_to;
use serde::{Deserialize, Serialize};

const SUM_TOLERANCE: f64 = 1e-9;

/// Relative weight of each metric in the aggregate score. Always sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricWeights {
    productivity: f64,
    reliability: f64,
    impact: f64,
    mastery: f64,
    endurance: f64,
}

pub const STANDARD_WEIGHTS: MetricWeights = MetricWeights {
    productivity: 0.25,
    reliability: 0.15,
    impact: 0.25,
    mastery: 0.15,
    endurance: 0.20,
};

impl MetricWeights {
    pub fn new(
        productivity: f64,
        reliability: f64,
        impact: f64,
        mastery: f64,
        endurance: f64,
    ) -> Result<Self, WeightError> {
        let weights = Self {
            productivity,
            reliability,
            impact,
            mastery,
            endurance,
        };

        if let Some(kind) = MetricKind::ALL
            .into_iter()
            .find(|kind| !(0.0..=1.0).contains(&weights.weight(*kind)))
        {
            return Err(WeightError::OutOfRange {
                metric: kind,
                weight: weights.weight(kind),
            });
        }

        let sum = weights.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightError::InvalidSum { sum });
        }

        Ok(weights)
    }

    pub fn standard() -> Self {
        STANDARD_WEIGHTS
    }

    pub fn weight(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Productivity => self.productivity,
            MetricKind::Reliability => self.reliability,
            MetricKind::Impact => self.impact,
            MetricKind::Mastery => self.mastery,
            MetricKind::Endurance => self.endurance,
        }
    }

    pub fn sum(&self) -> f64 {
        self.productivity + self.reliability + self.impact + self.mastery + self.endurance
    }

    /// Weighted sum of the already-rounded metric values, rounded to 2 decimals.
    pub fn aggregate(&self, metrics: &MetricSet) -> f64 {
        let weighted = (metrics.productivity.value * self.productivity)
            + (metrics.reliability.value * self.reliability)
            + (metrics.impact.value * self.impact)
            + (metrics.mastery.value * self.mastery)
            + (metrics.endurance.value * self.endurance);
        round_to(weighted, 2)
    }
}

impl Default for MetricWeights {
    fn default() -> Self {
        STANDARD_WEIGHTS
    }
}

impl<'de> Deserialize<'de> for MetricWeights {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawWeights {
            productivity: f64,
            reliability: f64,
            impact: f64,
            mastery: f64,
            endurance: f64,
        }

        let raw = RawWeights::deserialize(deserializer)?;
        MetricWeights::new(
            raw.productivity,
            raw.reliability,
            raw.impact,
            raw.mastery,
            raw.endurance,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("metric weights must sum to 1.0 (got {sum})")]
    InvalidSum { sum: f64 },
    #[error("weight for {metric} must be within [0, 1] (got {weight})")]
    OutOfRange { metric: MetricKind, weight: f64 },
}
