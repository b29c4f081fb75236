use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::to_bytes;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::analysis::ProfileAnalysisService;
use crate::enrichment::{EnrichmentContext, EnrichmentError, EnrichmentKind, TextEnricher};
use crate::leaderboard::{LeaderboardStore, StoreError, StoredProfile, LEADERBOARD_LIMIT};
use crate::scoring::ScoringEngine;
use crate::upstream::UpstreamPayload;

pub(super) const ENRICHMENT_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<HashMap<String, StoredProfile>>,
}

impl MemoryStore {
    pub(super) fn get(&self, username: &str) -> Option<StoredProfile> {
        self.records.lock().unwrap().get(username).cloned()
    }
}

impl LeaderboardStore for MemoryStore {
    fn fetch(&self, username: &str) -> Result<Option<StoredProfile>, StoreError> {
        Ok(self.records.lock().unwrap().get(username).cloned())
    }

    fn upsert(
        &self,
        username: &str,
        build: &dyn Fn(Option<&StoredProfile>) -> StoredProfile,
    ) -> Result<StoredProfile, StoreError> {
        let mut records = self.records.lock().unwrap();
        let profile = build(records.get(username));
        records.insert(username.to_string(), profile.clone());
        Ok(profile)
    }

    fn list(&self) -> Result<Vec<StoredProfile>, StoreError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }
}

pub(super) struct UnavailableStore;

impl LeaderboardStore for UnavailableStore {
    fn fetch(&self, _username: &str) -> Result<Option<StoredProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn upsert(
        &self,
        _username: &str,
        _build: &dyn Fn(Option<&StoredProfile>) -> StoredProfile,
    ) -> Result<StoredProfile, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<StoredProfile>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Answers every request kind with canned provider JSON.
pub(super) struct ScriptedEnricher;

impl TextEnricher for ScriptedEnricher {
    async fn summarize(&self, context: &EnrichmentContext) -> Result<String, EnrichmentError> {
        let body = match context.kind {
            EnrichmentKind::ProfileSummary => json!({ "summary": "A seasoned builder." }),
            EnrichmentKind::Comparison => json!({
                "headline": "A close contest",
                "reasoning": "Both ship often.",
                "insights": ["One", "Two", "Three", "Four"],
                "winnerUsername": "sparse"
            }),
        };
        Ok(body.to_string())
    }
}

pub(super) struct MalformedEnricher;

impl TextEnricher for MalformedEnricher {
    async fn summarize(&self, _context: &EnrichmentContext) -> Result<String, EnrichmentError> {
        Ok("not json at all".to_string())
    }
}

pub(super) struct StalledEnricher;

impl TextEnricher for StalledEnricher {
    async fn summarize(&self, _context: &EnrichmentContext) -> Result<String, EnrichmentError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(json!({ "summary": "never arrives" }).to_string())
    }
}

pub(super) fn build_service<S, E>(store: Arc<S>, enricher: E) -> ProfileAnalysisService<S, E>
where
    S: LeaderboardStore + 'static,
    E: TextEnricher + 'static,
{
    ProfileAnalysisService::new(
        ScoringEngine::default(),
        store,
        Arc::new(enricher),
        ENRICHMENT_TIMEOUT,
        LEADERBOARD_LIMIT,
    )
}

pub(super) fn timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Four 365-day years after `octo` joined.
pub(super) fn octo_as_of() -> DateTime<Utc> {
    timestamp("2023-12-31T00:00:00Z")
}

/// Two 365-day years after `sparse` joined.
pub(super) fn sparse_as_of() -> DateTime<Utc> {
    timestamp("2024-01-01T00:00:00Z")
}

pub(super) fn octo_json() -> Value {
    let days: Vec<Value> = (0..30)
        .map(|day| {
            json!({
                "contributionCount": if day == 25 { 0 } else { 1 },
                "date": format!("2023-06-{:02}", day + 1),
            })
        })
        .collect();

    json!({
        "source": "graphql",
        "user": {
            "login": "octo",
            "name": "Octo Cat",
            "avatarUrl": "https://avatars.example.com/octo.png",
            "bio": "Ships compilers",
            "company": "Octo Inc",
            "location": "Lisbon",
            "email": "octo@example.com",
            "createdAt": "2020-01-01T00:00:00Z",
            "followers": { "totalCount": 300 },
            "following": { "totalCount": 100 },
            "contributionsCollection": {
                "contributionCalendar": {
                    "totalContributions": 1500,
                    "weeks": [{ "contributionDays": days }]
                }
            },
            "pullRequests": { "totalCount": 80 },
            "mergedPRs": { "totalCount": 60 },
            "closedPRs": { "totalCount": 10 },
            "openPRs": { "totalCount": 10 },
            "repositories": {
                "nodes": [
                    {
                        "name": "compiler",
                        "description": "A toy compiler",
                        "stargazersCount": 120,
                        "forkCount": 7,
                        "url": "https://github.com/octo/compiler",
                        "languages": { "edges": [
                            { "size": 5000, "node": { "name": "Rust" } },
                            { "size": 1000, "node": { "name": "TypeScript" } }
                        ] }
                    },
                    {
                        "name": "web",
                        "stargazersCount": 40,
                        "languages": { "edges": [
                            { "size": 2000, "node": { "name": "TypeScript" } }
                        ] }
                    },
                    {
                        "name": "scripts",
                        "stargazersCount": 0,
                        "languages": { "edges": [
                            { "size": 1000, "node": { "name": "Python" } }
                        ] }
                    },
                    { "name": "notes" }
                ]
            }
        },
        "events": [
            {
                "id": "1",
                "type": "PushEvent",
                "repo": { "name": "octo/compiler" },
                "created_at": "2023-12-30T10:00:00Z",
                "payload": { "size": 2 }
            }
        ]
    })
}

pub(super) fn sparse_json() -> Value {
    json!({
        "source": "rest",
        "user": {
            "login": "sparse",
            "created_at": "2022-01-01T00:00:00Z",
            "followers": 0,
            "following": 0,
            "public_repos": 3
        },
        "repos": [
            { "name": "a", "full_name": "sparse/a", "language": "Go", "stargazers_count": 0 },
            { "name": "b", "full_name": "sparse/b", "language": "Go", "stargazers_count": 0 },
            { "name": "c", "full_name": "sparse/c", "language": null, "stargazers_count": 0 }
        ],
        "events": []
    })
}

pub(super) fn payload(value: Value) -> UpstreamPayload {
    serde_json::from_value(value).expect("fixture payload deserializes")
}

pub(super) fn octo_payload() -> UpstreamPayload {
    payload(octo_json())
}

pub(super) fn sparse_payload() -> UpstreamPayload {
    payload(sparse_json())
}

pub(super) fn nameless_payload() -> UpstreamPayload {
    payload(json!({
        "source": "rest",
        "user": { "login": "", "created_at": "2022-01-01T00:00:00Z" }
    }))
}

pub(super) async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
