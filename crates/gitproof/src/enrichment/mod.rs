//! Optional natural-language enrichment layered on top of deterministic results.
//!
//! Enrichment never changes a score or a winner. Callers go through [`enrich`],
//! which bounds the provider call with a timeout, and fall back to deterministic
//! text on any [`EnrichmentError`].

pub mod prompts;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentKind {
    ProfileSummary,
    Comparison,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentContext {
    pub kind: EnrichmentKind,
    pub prompt: String,
}

/// Where a piece of presented text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Deterministic,
    Enriched,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichmentError {
    #[error("enrichment unavailable: {0}")]
    Unavailable(String),
    #[error("enrichment timed out after {0:?}")]
    TimedOut(Duration),
    #[error("enrichment returned malformed output: {0}")]
    Malformed(String),
}

/// Narrow seam over any text-generation provider.
pub trait TextEnricher: Send + Sync {
    fn summarize(
        &self,
        context: &EnrichmentContext,
    ) -> impl Future<Output = Result<String, EnrichmentError>> + Send;
}

/// Offline default: reports itself unavailable so deterministic text is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

impl TextEnricher for NoopEnricher {
    async fn summarize(&self, _context: &EnrichmentContext) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable(
            "no enrichment provider configured".to_string(),
        ))
    }
}

/// Runs the provider call under `timeout`.
pub async fn enrich<E>(
    enricher: &E,
    context: &EnrichmentContext,
    timeout: Duration,
) -> Result<String, EnrichmentError>
where
    E: TextEnricher,
{
    match tokio::time::timeout(timeout, enricher.summarize(context)).await {
        Ok(result) => result,
        Err(_) => Err(EnrichmentError::TimedOut(timeout)),
    }
}
