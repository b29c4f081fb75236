use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::report::ProfileAnalysis;
use crate::comparison::{self, ComparisonResult};
use crate::config::AppConfig;
use crate::enrichment::TextEnricher;
use crate::leaderboard::{self, LeaderboardEntry, LeaderboardStore};
use crate::scoring::ScoringEngine;
use crate::upstream::{InvalidProfile, UpstreamPayload};

/// Service composing the scoring engine, leaderboard store, and text enricher.
pub struct ProfileAnalysisService<S, E> {
    engine: ScoringEngine,
    store: Arc<S>,
    enricher: Arc<E>,
    enrichment_timeout: Duration,
    leaderboard_limit: usize,
}

/// Analysis plus whether the leaderboard write went through.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis: ProfileAnalysis,
    pub persisted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub first: ProfileAnalysis,
    pub second: ProfileAnalysis,
    pub comparison: ComparisonResult,
}

impl<S, E> ProfileAnalysisService<S, E>
where
    S: LeaderboardStore + 'static,
    E: TextEnricher + 'static,
{
    pub fn new(
        engine: ScoringEngine,
        store: Arc<S>,
        enricher: Arc<E>,
        enrichment_timeout: Duration,
        leaderboard_limit: usize,
    ) -> Self {
        Self {
            engine,
            store,
            enricher,
            enrichment_timeout,
            leaderboard_limit,
        }
    }

    pub fn from_config(config: &AppConfig, store: Arc<S>, enricher: Arc<E>) -> Self {
        Self::new(
            ScoringEngine::default(),
            store,
            enricher,
            config.enrichment.timeout,
            config.leaderboard.limit,
        )
    }

    /// Analyse one payload as of `now`. Only malformed identity data is an error.
    pub async fn analyze(
        &self,
        payload: &UpstreamPayload,
        now: DateTime<Utc>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let record = payload.normalize()?;
        let scoring = self.engine.score(&record, now);
        let mut analysis = ProfileAnalysis::assemble(record, scoring, now);
        analysis
            .enrich_summary(self.enricher.as_ref(), self.enrichment_timeout)
            .await;

        let persisted = self.persist(&analysis, payload, now);

        info!(
            username = %analysis.username,
            source = ?payload.source(),
            score = analysis.scoring.score,
            grade = %analysis.scoring.grade,
            persisted,
            "profile analysed"
        );

        Ok(AnalysisOutcome {
            analysis,
            persisted,
        })
    }

    /// Analyse both payloads concurrently and compare them.
    pub async fn compare(
        &self,
        first: &UpstreamPayload,
        second: &UpstreamPayload,
        now: DateTime<Utc>,
    ) -> Result<ComparisonReport, AnalysisError> {
        let (first, second) = tokio::join!(self.analyze(first, now), self.analyze(second, now));
        let first = first?.analysis;
        let second = second?.analysis;

        let comparison = comparison::compare_with_enrichment(
            &first,
            &second,
            self.enricher.as_ref(),
            self.enrichment_timeout,
        )
        .await;

        Ok(ComparisonReport {
            first,
            second,
            comparison,
        })
    }

    /// Ranked leaderboard; an unavailable store yields an empty board.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        match self.store.list() {
            Ok(records) => leaderboard::rank_entries(records, self.leaderboard_limit),
            Err(err) => {
                warn!(error = %err, "leaderboard read failed; returning empty board");
                Vec::new()
            }
        }
    }

    fn persist(
        &self,
        analysis: &ProfileAnalysis,
        payload: &UpstreamPayload,
        now: DateTime<Utc>,
    ) -> bool {
        let raw_profile = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(err) => {
                warn!(username = %analysis.username, error = %err, "failed to encode raw profile");
                return false;
            }
        };

        match leaderboard::record_analysis(self.store.as_ref(), analysis, raw_profile, now) {
            Ok(stored) => {
                tracing::debug!(
                    username = %stored.username,
                    view_count = stored.view_count,
                    "leaderboard entry saved"
                );
                true
            }
            Err(err) => {
                warn!(username = %analysis.username, error = %err, "leaderboard write failed");
                false
            }
        }
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    InvalidProfile(#[from] InvalidProfile),
}
