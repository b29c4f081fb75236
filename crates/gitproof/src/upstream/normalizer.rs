use super::{InvalidProfile, RawEvent};
use crate::scoring::{Activity, TopRepository};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub(super) const TOP_LANGUAGE_LIMIT: usize = 10;
pub(super) const UNKNOWN: &str = "Unknown";

/// Accumulates per-language weight while remembering first-seen order for ties.
#[derive(Debug, Default)]
pub(super) struct LanguageTally {
    positions: HashMap<String, usize>,
    weights: Vec<(String, u64)>,
}

impl LanguageTally {
    pub(super) fn add(&mut self, language: &str, weight: u64) {
        match self.positions.get(language).copied() {
            Some(index) => {
                let total = &mut self.weights[index].1;
                *total = total.saturating_add(weight);
            }
            None => {
                self.positions.insert(language.to_string(), self.weights.len());
                self.weights.push((language.to_string(), weight));
            }
        }
    }

    pub(super) fn ranked(mut self) -> Vec<String> {
        self.weights.sort_by(|a, b| b.1.cmp(&a.1));
        self.weights
            .into_iter()
            .take(TOP_LANGUAGE_LIMIT)
            .map(|(language, _)| language)
            .collect()
    }
}

/// First repository with the strictly greatest positive star count.
pub(super) fn top_repository<I>(candidates: I) -> TopRepository
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut top = TopRepository::default();
    for (name, stars) in candidates {
        if stars > top.stars {
            top = TopRepository { name, stars };
        }
    }
    top
}

/// Longest run of consecutive days with at least one contribution.
pub(super) fn longest_streak<I>(daily_counts: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    let mut current = 0;
    let mut longest = 0;
    for count in daily_counts {
        if count > 0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

pub(super) fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|text| !text.is_empty()).cloned()
}

pub(super) fn require_username(login: &Option<String>) -> Result<String, InvalidProfile> {
    present(login).ok_or(InvalidProfile::MissingUsername)
}

pub(super) fn parse_created_at(
    username: &str,
    created_at: &Option<String>,
) -> Result<DateTime<Utc>, InvalidProfile> {
    let value = present(created_at).ok_or_else(|| InvalidProfile::MissingCreationTimestamp {
        username: username.to_string(),
    })?;

    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|source| InvalidProfile::InvalidCreationTimestamp {
            username: username.to_string(),
            value,
            source,
        })
}

pub(super) fn activities(events: &[RawEvent]) -> Vec<Activity> {
    events
        .iter()
        .map(|event| Activity {
            id: event.id.clone().unwrap_or_default(),
            kind: event.kind.clone().unwrap_or_default(),
            repo_name: event
                .repo
                .as_ref()
                .and_then(|repo| present(&repo.name))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            created_at: event.created_at.clone(),
            payload: event.payload.clone(),
        })
        .collect()
}
