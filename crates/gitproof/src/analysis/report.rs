use crate::enrichment::{self, prompts, EnrichmentContext, EnrichmentKind, TextEnricher, TextSource};
use crate::scoring::metrics::years_between;
use crate::scoring::scale::round_to;
use crate::scoring::{
    Activity, CanonicalProfileRecord, MetricResult, PullRequestStats, RepositorySummary,
    ScoringResult,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BIO: &str = "No bio available";
const DEFAULT_LOCATION: &str = "Remote";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopRepositoryView {
    pub name: String,
    pub stars: u64,
    pub url: String,
}

/// Presentable result of analysing one account: profile facts, scores, and summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: String,
    pub location: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub repositories: u64,
    pub years_on_github: f64,
    pub total_stars: u64,
    pub total_contributions: Option<u64>,
    pub longest_streak: Option<u64>,
    pub pull_requests: Option<PullRequestStats>,
    pub scoring: ScoringResult,
    pub tech_stack: Vec<String>,
    pub summary: String,
    pub summary_source: TextSource,
    pub last_scanned: NaiveDate,
    pub recent_activity: Vec<Activity>,
    pub repos: Vec<RepositorySummary>,
    pub top_repo: TopRepositoryView,
}

impl ProfileAnalysis {
    pub fn assemble(
        record: CanonicalProfileRecord,
        scoring: ScoringResult,
        now: DateTime<Utc>,
    ) -> Self {
        let full_name = record.display_name().to_string();
        let years_on_github = round_to(years_between(record.account_created_at, now), 1);
        let summary = deterministic_summary(&full_name, &scoring);
        let top_repo = TopRepositoryView {
            url: format!("https://github.com/{}", record.top_repository.name),
            name: record.top_repository.name,
            stars: record.top_repository.stars,
        };
        let profile = record.profile;

        Self {
            username: record.username,
            full_name,
            avatar_url: record.avatar_url,
            bio: profile.bio.unwrap_or_else(|| DEFAULT_BIO.to_string()),
            location: profile
                .location
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            email: profile.email,
            company: profile.company,
            followers: record.followers,
            following: record.following,
            repositories: record.public_repo_count,
            years_on_github,
            total_stars: record.total_stars,
            total_contributions: record.total_contributions,
            longest_streak: record.longest_streak,
            pull_requests: record.pull_requests,
            scoring,
            tech_stack: record.top_languages,
            summary,
            summary_source: TextSource::Deterministic,
            last_scanned: now.date_naive(),
            recent_activity: record.recent_activity,
            repos: record.repositories,
            top_repo,
        }
    }

    pub fn strongest_metric(&self) -> &MetricResult {
        self.scoring.metrics.strongest()
    }

    /// Replaces the summary with provider text; keeps the deterministic one on any failure.
    pub async fn enrich_summary<E>(&mut self, enricher: &E, timeout: Duration)
    where
        E: TextEnricher,
    {
        let context = EnrichmentContext {
            kind: EnrichmentKind::ProfileSummary,
            prompt: prompts::profile_summary_prompt(self),
        };

        let outcome = enrichment::enrich(enricher, &context, timeout)
            .await
            .and_then(|raw| prompts::parse_summary(&raw));

        match outcome {
            Ok(summary) => {
                debug!(username = %self.username, "profile summary enriched");
                self.summary = summary;
                self.summary_source = TextSource::Enriched;
            }
            Err(err) => {
                warn!(
                    username = %self.username,
                    error = %err,
                    "summary enrichment failed; keeping deterministic summary"
                );
            }
        }
    }
}

pub fn deterministic_summary(full_name: &str, scoring: &ScoringResult) -> String {
    format!(
        "{} has a GitProof score of {} ({}). Strongest in {}.",
        full_name,
        scoring.score,
        scoring.grade,
        scoring.metrics.strongest().kind
    )
}
