use super::common::*;
use crate::analysis::AnalysisError;
use crate::comparison::ComparisonOutcome;
use crate::enrichment::{NoopEnricher, TextSource};
use crate::scoring::{Grade, MetricKind};
use crate::upstream::InvalidProfile;
use std::sync::Arc;

#[tokio::test]
async fn analyze_scores_graphql_payload() {
    let store = Arc::new(MemoryStore::default());
    let service = build_service(store.clone(), NoopEnricher);

    let outcome = service
        .analyze(&octo_payload(), octo_as_of())
        .await
        .expect("analysis succeeds");
    let analysis = outcome.analysis;
    let metrics = &analysis.scoring.metrics;

    assert_eq!(metrics.productivity.value, 6.9);
    assert_eq!(metrics.reliability.value, 7.4);
    assert_eq!(metrics.impact.value, 7.0);
    assert_eq!(metrics.mastery.value, 5.1);
    assert_eq!(metrics.endurance.value, 4.6);
    assert_eq!(analysis.scoring.score, 6.27);
    assert_eq!(analysis.scoring.grade, Grade::B);
    assert_eq!(analysis.scoring.percentile, 70);

    assert_eq!(analysis.full_name, "Octo Cat");
    assert_eq!(analysis.years_on_github, 4.0);
    assert_eq!(analysis.longest_streak, Some(25));
    assert_eq!(analysis.tech_stack, vec!["Rust", "TypeScript", "Python"]);
    assert_eq!(analysis.top_repo.name, "octo/compiler");
    assert_eq!(analysis.top_repo.url, "https://github.com/octo/compiler");
    assert_eq!(analysis.recent_activity.len(), 1);
    assert_eq!(analysis.strongest_metric().kind, MetricKind::Reliability);
    assert_eq!(
        analysis.summary,
        "Octo Cat has a GitProof score of 6.27 (B). Strongest in reliability."
    );
    assert_eq!(analysis.summary_source, TextSource::Deterministic);
    assert!(outcome.persisted);
}

#[tokio::test]
async fn analyze_applies_neutral_defaults_for_rest_payload() {
    let service = build_service(Arc::new(MemoryStore::default()), NoopEnricher);

    let outcome = service
        .analyze(&sparse_payload(), sparse_as_of())
        .await
        .expect("analysis succeeds");
    let analysis = outcome.analysis;

    assert_eq!(analysis.scoring.score, 2.39);
    assert_eq!(analysis.scoring.grade, Grade::F);
    assert_eq!(analysis.scoring.percentile, 5);
    assert_eq!(analysis.full_name, "sparse");
    assert_eq!(analysis.bio, "No bio available");
    assert_eq!(analysis.location, "Remote");
    assert_eq!(analysis.total_contributions, None);
    assert_eq!(analysis.pull_requests, None);
    assert_eq!(
        analysis.summary,
        "sparse has a GitProof score of 2.39 (F). Strongest in mastery."
    );
}

#[tokio::test]
async fn analyze_is_idempotent_for_fixed_inputs() {
    let service = build_service(Arc::new(MemoryStore::default()), NoopEnricher);
    let payload = octo_payload();

    let first = service.analyze(&payload, octo_as_of()).await.expect("first");
    let second = service.analyze(&payload, octo_as_of()).await.expect("second");

    assert_eq!(first.analysis, second.analysis);
}

#[tokio::test]
async fn analyze_rejects_missing_username() {
    let store = Arc::new(MemoryStore::default());
    let service = build_service(store.clone(), NoopEnricher);

    match service.analyze(&nameless_payload(), sparse_as_of()).await {
        Err(AnalysisError::InvalidProfile(InvalidProfile::MissingUsername)) => {}
        other => panic!("expected missing username, got {other:?}"),
    }
    assert!(store.get("").is_none());
}

#[tokio::test]
async fn analyze_increments_view_count_on_repeat_visits() {
    let store = Arc::new(MemoryStore::default());
    let service = build_service(store.clone(), NoopEnricher);

    for _ in 0..3 {
        service
            .analyze(&sparse_payload(), sparse_as_of())
            .await
            .expect("analysis succeeds");
    }

    let stored = store.get("sparse").expect("stored profile");
    assert_eq!(stored.view_count, 3);
    assert_eq!(stored.score, 2.39);
    assert_eq!(stored.grade, Grade::F);
    assert_eq!(stored.raw_profile["source"], "rest");
    assert_eq!(stored.updated_at, sparse_as_of());
}

#[tokio::test]
async fn analyze_survives_unavailable_store() {
    let service = build_service(Arc::new(UnavailableStore), NoopEnricher);

    let outcome = service
        .analyze(&sparse_payload(), sparse_as_of())
        .await
        .expect("analysis still returned");

    assert!(!outcome.persisted);
    assert_eq!(outcome.analysis.scoring.score, 2.39);
    assert!(service.leaderboard().is_empty());
}

#[tokio::test]
async fn enrichment_replaces_summary_only() {
    let service = build_service(Arc::new(MemoryStore::default()), ScriptedEnricher);

    let outcome = service
        .analyze(&octo_payload(), octo_as_of())
        .await
        .expect("analysis succeeds");

    assert_eq!(outcome.analysis.summary, "A seasoned builder.");
    assert_eq!(outcome.analysis.summary_source, TextSource::Enriched);
    assert_eq!(outcome.analysis.scoring.score, 6.27);
}

#[tokio::test]
async fn malformed_enrichment_keeps_deterministic_summary() {
    let service = build_service(Arc::new(MemoryStore::default()), MalformedEnricher);

    let outcome = service
        .analyze(&sparse_payload(), sparse_as_of())
        .await
        .expect("analysis succeeds");

    assert_eq!(outcome.analysis.summary_source, TextSource::Deterministic);
    assert!(outcome.analysis.summary.starts_with("sparse has a GitProof score"));
}

#[tokio::test(start_paused = true)]
async fn stalled_enrichment_times_out_to_deterministic_text() {
    let service = build_service(Arc::new(MemoryStore::default()), StalledEnricher);

    let report = service
        .compare(&octo_payload(), &sparse_payload(), octo_as_of())
        .await
        .expect("comparison succeeds");

    assert_eq!(report.first.summary_source, TextSource::Deterministic);
    assert_eq!(report.comparison.text_source, TextSource::Deterministic);
    assert_eq!(report.comparison.winner_username, "octo");
}

#[tokio::test]
async fn compare_picks_higher_score_and_ignores_provider_winner() {
    let service = build_service(Arc::new(MemoryStore::default()), ScriptedEnricher);

    let report = service
        .compare(&octo_payload(), &sparse_payload(), octo_as_of())
        .await
        .expect("comparison succeeds");
    let comparison = report.comparison;

    assert_eq!(comparison.winner_username, "octo");
    assert_eq!(comparison.outcome, ComparisonOutcome::Decisive);
    assert_eq!(comparison.headline, "A close contest");
    assert_eq!(comparison.insights.len(), 4);
    assert_eq!(comparison.text_source, TextSource::Enriched);
    assert_eq!(
        comparison.score_delta,
        crate::scoring::scale::round_to(report.first.scoring.score - report.second.scoring.score, 2)
    );
}

#[tokio::test]
async fn compare_propagates_invalid_profiles() {
    let service = build_service(Arc::new(MemoryStore::default()), NoopEnricher);

    let result = service
        .compare(&octo_payload(), &nameless_payload(), octo_as_of())
        .await;

    assert!(matches!(result, Err(AnalysisError::InvalidProfile(_))));
}

#[tokio::test]
async fn leaderboard_ranks_analysed_profiles() {
    let service = build_service(Arc::new(MemoryStore::default()), NoopEnricher);

    service
        .analyze(&sparse_payload(), sparse_as_of())
        .await
        .expect("sparse");
    service
        .analyze(&octo_payload(), octo_as_of())
        .await
        .expect("octo");

    let board = service.leaderboard();
    let usernames: Vec<_> = board.iter().map(|entry| entry.username.as_str()).collect();
    assert_eq!(usernames, vec!["octo", "sparse"]);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].grade, Grade::B);
    assert_eq!(board[1].view_count, 1);
}
