use super::domain::{CanonicalProfileRecord, MetricKind, MetricResult, ProfileFields};
use super::scale::{clamp_score, linear_scale, log_scale, round_to};
use chrono::{DateTime, Utc};

const MILLIS_PER_YEAR: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 365.0;

/// Sub-score substituted when an upstream signal is unknown.
pub const NEUTRAL_SUBSCORE: f64 = 5.0;
const DEFAULT_COMMITS_PER_REPO: f64 = 50.0;
const FOLLOW_RATIO_NEUTRAL: f64 = 5.0;
const DEPTH_WITH_REPOSITORIES: f64 = 7.0;
const DEPTH_WITHOUT_REPOSITORIES: f64 = 5.0;
const FRAMEWORK_PRESENT: f64 = 8.0;
const FRAMEWORK_ABSENT: f64 = 5.0;

/// Top-language names that count as a framework signal (exact, case-sensitive).
pub const FRAMEWORK_SIGNALS: [&str; 7] = [
    "React", "Vue", "Angular", "Django", "Rails", "Spring", "Next.js",
];

/// A record bound to the evaluation instant, so account age is computed once.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    record: &'a CanonicalProfileRecord,
    years_active: f64,
}

impl<'a> ScoringContext<'a> {
    pub fn new(record: &'a CanonicalProfileRecord, now: DateTime<Utc>) -> Self {
        Self {
            record,
            years_active: years_between(record.account_created_at, now),
        }
    }

    pub fn record(&self) -> &'a CanonicalProfileRecord {
        self.record
    }

    pub fn years_active(&self) -> f64 {
        self.years_active
    }
}

/// Fractional 365-day years between two instants; negative when `to` precedes `from`.
pub fn years_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_YEAR
}

pub fn endurance(ctx: &ScoringContext<'_>) -> MetricResult {
    let record = ctx.record();
    let years = ctx.years_active();

    let years_score = linear_scale(years, 10.0);
    let streak_score = record
        .longest_streak
        .map(|streak| linear_scale(streak as f64, 100.0))
        .unwrap_or(NEUTRAL_SUBSCORE);
    let regularity_score = record
        .total_contributions
        .map(|total| linear_scale(total as f64 / years.max(1.0), 200.0))
        .unwrap_or(NEUTRAL_SUBSCORE);

    let raw = (years_score * 0.4) + (streak_score * 0.4) + (regularity_score * 0.2);
    metric(
        MetricKind::Endurance,
        raw,
        format!(
            "years active {years:.1} -> {years_score:.1}, longest streak {} -> {streak_score:.1}, regularity -> {regularity_score:.1}",
            describe_count(record.longest_streak, "days"),
        ),
    )
}

pub fn productivity(ctx: &ScoringContext<'_>) -> MetricResult {
    let record = ctx.record();
    let pull_requests = record.pull_request_stats();

    let contribution_score = record
        .total_contributions
        .map(|total| log_scale(total as f64, 5000.0))
        .unwrap_or(NEUTRAL_SUBSCORE);
    let repository_score = log_scale(record.public_repo_count as f64, 100.0);
    let pull_request_score = log_scale(pull_requests.total as f64, 500.0);
    let commits_per_repo = match record.total_contributions {
        Some(total) if record.public_repo_count > 0 => {
            total as f64 / record.public_repo_count as f64
        }
        _ => DEFAULT_COMMITS_PER_REPO,
    };
    let commit_score = linear_scale(commits_per_repo, 100.0);

    let raw = (contribution_score * 0.4)
        + (repository_score * 0.3)
        + (pull_request_score * 0.2)
        + (commit_score * 0.1);
    metric(
        MetricKind::Productivity,
        raw,
        format!(
            "contributions {} -> {contribution_score:.1}, {} public repos -> {repository_score:.1}, {} PRs -> {pull_request_score:.1}, {commits_per_repo:.1} commits/repo -> {commit_score:.1}",
            describe_count(record.total_contributions, "total"),
            record.public_repo_count,
            pull_requests.total,
        ),
    )
}

pub fn reliability(ctx: &ScoringContext<'_>) -> MetricResult {
    let record = ctx.record();

    let completeness = profile_completeness(&record.profile);
    let acceptance_rate = record.pull_request_stats().acceptance_rate();
    let acceptance_score = acceptance_rate * 10.0;
    let follow_ratio = follow_ratio_score(record.followers, record.following);
    let age_score = linear_scale(ctx.years_active(), 8.0);

    let raw = (completeness * 0.4)
        + (acceptance_score * 0.3)
        + (follow_ratio * 0.15)
        + (age_score * 0.15);
    metric(
        MetricKind::Reliability,
        raw,
        format!(
            "profile completeness {completeness:.1}, PR acceptance {:.0}% -> {acceptance_score:.1}, follow ratio -> {follow_ratio:.1}, account age -> {age_score:.1}",
            acceptance_rate * 100.0,
        ),
    )
}

pub fn impact(ctx: &ScoringContext<'_>) -> MetricResult {
    let record = ctx.record();

    let stars_score = log_scale(record.total_stars as f64, 1000.0);
    let followers_score = log_scale(record.followers as f64, 10000.0);
    let top_repo_score = if record.top_repository.stars > 0 {
        log_scale(record.top_repository.stars as f64, 500.0)
    } else {
        0.0
    };

    let raw = (stars_score * 0.4) + (followers_score * 0.35) + (top_repo_score * 0.25);
    metric(
        MetricKind::Impact,
        raw,
        format!(
            "{} stars -> {stars_score:.1}, {} followers -> {followers_score:.1}, top repo {} stars -> {top_repo_score:.1}",
            record.total_stars, record.followers, record.top_repository.stars,
        ),
    )
}

pub fn mastery(ctx: &ScoringContext<'_>) -> MetricResult {
    let record = ctx.record();

    let language_count = record.top_languages.len();
    let diversity_score = linear_scale(language_count as f64, 8.0);
    let depth_signal = if record.repositories.is_empty() {
        DEPTH_WITHOUT_REPOSITORIES
    } else {
        DEPTH_WITH_REPOSITORIES
    };
    let framework_signal = if has_framework_signal(&record.top_languages) {
        FRAMEWORK_PRESENT
    } else {
        FRAMEWORK_ABSENT
    };

    let raw = (diversity_score * 0.4) + (depth_signal * 0.3) + (framework_signal * 0.3);
    metric(
        MetricKind::Mastery,
        raw,
        format!(
            "{language_count} languages -> {diversity_score:.1}, depth signal {depth_signal:.1}, framework signal {framework_signal:.1}",
        ),
    )
}

/// Fixed points per populated profile field, capped at 10.
pub fn profile_completeness(profile: &ProfileFields) -> f64 {
    let mut score = 0.0;
    if profile.name.is_some() {
        score += 2.0;
    }
    if profile.bio.is_some() {
        score += 2.0;
    }
    if profile.location.is_some() {
        score += 1.5;
    }
    if profile.company.is_some() {
        score += 1.5;
    }
    if profile.email.is_some() {
        score += 1.0;
    }
    if profile.has_blog_or_social() {
        score += 1.0;
    }
    if profile.is_hireable() {
        score += 1.0;
    }
    f64::min(10.0, score)
}

pub fn follow_ratio_score(followers: u64, following: u64) -> f64 {
    if followers == 0 {
        return FOLLOW_RATIO_NEUTRAL;
    }
    f64::min(10.0, (followers as f64 / following.max(1) as f64) * 2.0)
}

pub fn has_framework_signal(languages: &[String]) -> bool {
    languages
        .iter()
        .any(|language| FRAMEWORK_SIGNALS.contains(&language.as_str()))
}

fn metric(kind: MetricKind, raw: f64, rationale: String) -> MetricResult {
    MetricResult {
        kind,
        label: kind.label().to_string(),
        value: round_to(clamp_score(raw), 1),
        description: kind.description().to_string(),
        rationale,
    }
}

fn describe_count(value: Option<u64>, unit: &str) -> String {
    match value {
        Some(count) => format!("{count} {unit}"),
        None => "unknown".to_string(),
    }
}
