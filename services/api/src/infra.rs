use chrono::{DateTime, Utc};
use gitproof::error::AppError;
use gitproof::leaderboard::{LeaderboardStore, StoreError, StoredProfile};
use gitproof::upstream::UpstreamPayload;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local leaderboard; contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeaderboardStore {
    records: Arc<Mutex<HashMap<String, StoredProfile>>>,
}

impl InMemoryLeaderboardStore {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<String, StoredProfile>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("leaderboard mutex poisoned".to_string()))
    }
}

impl LeaderboardStore for InMemoryLeaderboardStore {
    fn fetch(&self, username: &str) -> Result<Option<StoredProfile>, StoreError> {
        Ok(self.guard()?.get(username).cloned())
    }

    fn upsert(
        &self,
        username: &str,
        build: &dyn Fn(Option<&StoredProfile>) -> StoredProfile,
    ) -> Result<StoredProfile, StoreError> {
        let mut records = self.guard()?;
        let profile = build(records.get(username));
        records.insert(username.to_string(), profile.clone());
        Ok(profile)
    }

    fn list(&self) -> Result<Vec<StoredProfile>, StoreError> {
        Ok(self.guard()?.values().cloned().collect())
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}

pub(crate) fn read_payload(path: &Path) -> Result<UpstreamPayload, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
