//! Leaderboard persistence seam and ranking.

pub mod export;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::ProfileAnalysis;
use crate::scoring::Grade;

/// Default number of ranked entries returned.
pub const LEADERBOARD_LIMIT: usize = 50;

/// Persisted view of the latest analysis for a username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub score: f64,
    pub grade: Grade,
    pub view_count: u64,
    pub raw_profile: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction so the analysis service can be exercised in isolation.
pub trait LeaderboardStore: Send + Sync {
    fn fetch(&self, username: &str) -> Result<Option<StoredProfile>, StoreError>;
    /// Replaces the row for `username` with `build(existing)` as one atomic step.
    fn upsert(
        &self,
        username: &str,
        build: &dyn Fn(Option<&StoredProfile>) -> StoredProfile,
    ) -> Result<StoredProfile, StoreError>;
    fn list(&self) -> Result<Vec<StoredProfile>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("leaderboard store unavailable: {0}")]
    Unavailable(String),
}

/// One row of the ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub score: f64,
    pub grade: Grade,
    pub view_count: u64,
}

/// Upserts the analysis, bumping the view count for returning usernames.
pub fn record_analysis<S>(
    store: &S,
    analysis: &ProfileAnalysis,
    raw_profile: serde_json::Value,
    now: DateTime<Utc>,
) -> Result<StoredProfile, StoreError>
where
    S: LeaderboardStore + ?Sized,
{
    store.upsert(&analysis.username, &|existing| StoredProfile {
        username: analysis.username.clone(),
        full_name: analysis.full_name.clone(),
        avatar_url: analysis.avatar_url.clone(),
        score: analysis.scoring.score,
        grade: analysis.scoring.grade,
        view_count: existing
            .map(|profile| profile.view_count)
            .unwrap_or(0)
            .saturating_add(1),
        raw_profile: raw_profile.clone(),
        updated_at: now,
    })
}

/// Orders by score, then views, then username; assigns 1-based ranks.
pub fn rank_entries(mut records: Vec<StoredProfile>, limit: usize) -> Vec<LeaderboardEntry> {
    records.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.view_count.cmp(&a.view_count))
            .then_with(|| a.username.cmp(&b.username))
    });

    records
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, record)| LeaderboardEntry {
            rank: index + 1,
            username: record.username,
            full_name: record.full_name,
            avatar_url: record.avatar_url,
            score: record.score,
            grade: record.grade,
            view_count: record.view_count,
        })
        .collect()
}
