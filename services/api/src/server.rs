use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeaderboardStore};
use crate::routes::with_analysis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gitproof::analysis::ProfileAnalysisService;
use gitproof::config::AppConfig;
use gitproof::enrichment::NoopEnricher;
use gitproof::error::AppError;
use gitproof::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryLeaderboardStore::default());
    let enricher = Arc::new(NoopEnricher);
    let analysis_service = Arc::new(ProfileAnalysisService::from_config(&config, store, enricher));

    let app = with_analysis_routes(analysis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        enrichment_timeout_ms = config.enrichment.timeout.as_millis() as u64,
        leaderboard_limit = config.leaderboard.limit,
        "gitproof analysis service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
