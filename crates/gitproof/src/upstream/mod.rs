//! Upstream GitHub payload shapes and their reconciliation into one canonical record.

mod graphql;
mod normalizer;
mod rest;

pub use graphql::{
    ContributionCalendar, ContributionDay, ContributionWeek, GraphQlPayload, GraphQlRepository,
    GraphQlUser, LanguageEdge, TotalCount,
};
pub use rest::{RestPayload, RestRepository, RestUser};

use crate::scoring::CanonicalProfileRecord;
use serde::{Deserialize, Serialize};

/// Raw account telemetry, tagged by the API it was fetched from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum UpstreamPayload {
    Graphql(GraphQlPayload),
    Rest(RestPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamSource {
    Graphql,
    Rest,
}

impl UpstreamPayload {
    pub fn source(&self) -> UpstreamSource {
        match self {
            UpstreamPayload::Graphql(_) => UpstreamSource::Graphql,
            UpstreamPayload::Rest(_) => UpstreamSource::Rest,
        }
    }

    /// Resolves the payload into a canonical record; missing signals become defaults.
    pub fn normalize(&self) -> Result<CanonicalProfileRecord, InvalidProfile> {
        match self {
            UpstreamPayload::Graphql(payload) => graphql::normalize(payload),
            UpstreamPayload::Rest(payload) => rest::normalize(payload),
        }
    }
}

/// Raw public event as returned by the events endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub repo: Option<RawEventRepo>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEventRepo {
    pub name: Option<String>,
}

/// The only input condition that stops an analysis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidProfile {
    #[error("upstream profile has no username")]
    MissingUsername,
    #[error("profile '{username}' has no account creation timestamp")]
    MissingCreationTimestamp { username: String },
    #[error("profile '{username}' has an unparseable creation timestamp '{value}'")]
    InvalidCreationTimestamp {
        username: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
