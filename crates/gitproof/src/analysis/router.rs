use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::service::{AnalysisError, ProfileAnalysisService};
use crate::enrichment::TextEnricher;
use crate::leaderboard::{export, LeaderboardStore};
use crate::upstream::UpstreamPayload;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub payload: UpstreamPayload,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub first: UpstreamPayload,
    pub second: UpstreamPayload,
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// Router builder exposing analysis, comparison, and leaderboard endpoints.
pub fn analysis_router<S, E>(service: Arc<ProfileAnalysisService<S, E>>) -> Router
where
    S: LeaderboardStore + 'static,
    E: TextEnricher + 'static,
{
    Router::new()
        .route("/api/v1/profiles/analyze", post(analyze_handler::<S, E>))
        .route("/api/v1/profiles/compare", post(compare_handler::<S, E>))
        .route("/api/v1/leaderboard", get(leaderboard_handler::<S, E>))
        .route("/api/v1/leaderboard.csv", get(leaderboard_csv_handler::<S, E>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<S, E>(
    State(service): State<Arc<ProfileAnalysisService<S, E>>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Response
where
    S: LeaderboardStore + 'static,
    E: TextEnricher + 'static,
{
    let now = request.as_of.unwrap_or_else(Utc::now);
    match service.analyze(&request.payload, now).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn compare_handler<S, E>(
    State(service): State<Arc<ProfileAnalysisService<S, E>>>,
    axum::Json(request): axum::Json<CompareRequest>,
) -> Response
where
    S: LeaderboardStore + 'static,
    E: TextEnricher + 'static,
{
    let now = request.as_of.unwrap_or_else(Utc::now);
    match service.compare(&request.first, &request.second, now).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn leaderboard_handler<S, E>(
    State(service): State<Arc<ProfileAnalysisService<S, E>>>,
) -> Response
where
    S: LeaderboardStore + 'static,
    E: TextEnricher + 'static,
{
    let entries = service.leaderboard();
    (StatusCode::OK, axum::Json(json!({ "entries": entries }))).into_response()
}

pub(crate) async fn leaderboard_csv_handler<S, E>(
    State(service): State<Arc<ProfileAnalysisService<S, E>>>,
) -> Response
where
    S: LeaderboardStore + 'static,
    E: TextEnricher + 'static,
{
    match export::to_csv(&service.leaderboard()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: AnalysisError) -> Response {
    match err {
        AnalysisError::InvalidProfile(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
