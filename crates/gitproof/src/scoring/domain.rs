use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pull-request counters; absent entirely when the upstream source cannot supply them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestStats {
    pub total: u64,
    pub merged: u64,
    pub closed: u64,
    pub open: u64,
}

impl PullRequestStats {
    /// Share of finished pull requests that were merged; 0 when nothing finished.
    pub fn acceptance_rate(&self) -> f64 {
        let finished = self.merged as f64 + self.closed as f64;
        if finished > 0.0 {
            self.merged as f64 / finished
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopRepository {
    pub name: String,
    pub stars: u64,
}

/// Optional profile fields. Empty strings are normalized to `None` upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    pub hireable: Option<bool>,
}

impl ProfileFields {
    pub fn has_blog_or_social(&self) -> bool {
        self.blog.is_some() || self.twitter_username.is_some()
    }

    pub fn is_hireable(&self) -> bool {
        self.hireable.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub forks: u64,
    pub url: String,
    pub tech_stack_count: u32,
}

/// Public event from the account's activity stream, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub kind: String,
    pub repo_name: String,
    pub created_at: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Source-independent input consumed by every metric calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProfileRecord {
    pub username: String,
    pub avatar_url: Option<String>,
    pub account_created_at: DateTime<Utc>,
    pub followers: u64,
    pub following: u64,
    pub public_repo_count: u64,
    pub total_contributions: Option<u64>,
    pub longest_streak: Option<u64>,
    pub pull_requests: Option<PullRequestStats>,
    pub total_stars: u64,
    pub top_languages: Vec<String>,
    pub top_repository: TopRepository,
    pub profile: ProfileFields,
    pub repositories: Vec<RepositorySummary>,
    pub recent_activity: Vec<Activity>,
}

impl CanonicalProfileRecord {
    /// Minimal record with every optional signal unknown.
    pub fn new(username: impl Into<String>, account_created_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            avatar_url: None,
            account_created_at,
            followers: 0,
            following: 0,
            public_repo_count: 0,
            total_contributions: None,
            longest_streak: None,
            pull_requests: None,
            total_stars: 0,
            top_languages: Vec::new(),
            top_repository: TopRepository::default(),
            profile: ProfileFields::default(),
            repositories: Vec::new(),
            recent_activity: Vec::new(),
        }
    }

    pub fn pull_request_stats(&self) -> PullRequestStats {
        self.pull_requests.unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.profile.name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Productivity,
    Reliability,
    Impact,
    Mastery,
    Endurance,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::Productivity,
        MetricKind::Reliability,
        MetricKind::Impact,
        MetricKind::Mastery,
        MetricKind::Endurance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Productivity => "Productivity",
            MetricKind::Reliability => "Reliability",
            MetricKind::Impact => "Impact",
            MetricKind::Mastery => "Mastery",
            MetricKind::Endurance => "Endurance",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            MetricKind::Productivity => "productivity",
            MetricKind::Reliability => "reliability",
            MetricKind::Impact => "impact",
            MetricKind::Mastery => "mastery",
            MetricKind::Endurance => "endurance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MetricKind::Productivity => {
                "Total contributions (40%) + volume (30%) + PR activity (20%)"
            }
            MetricKind::Reliability => {
                "Profile completeness (40%) + PR acceptance (30%) + reputation"
            }
            MetricKind::Impact => "Stars earned (40%) + followers (35%) + viral reach (25%)",
            MetricKind::Mastery => {
                "Language diversity (40%) + depth signals (30%) + toolchain (30%)"
            }
            MetricKind::Endurance => {
                "Years active (40%) + contribution streak (40%) + regularity (20%)"
            }
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One bounded sub-score with its formula description and computed inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub kind: MetricKind,
    pub label: String,
    pub value: f64,
    pub description: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub productivity: MetricResult,
    pub reliability: MetricResult,
    pub impact: MetricResult,
    pub mastery: MetricResult,
    pub endurance: MetricResult,
}

impl MetricSet {
    pub fn get(&self, kind: MetricKind) -> &MetricResult {
        match kind {
            MetricKind::Productivity => &self.productivity,
            MetricKind::Reliability => &self.reliability,
            MetricKind::Impact => &self.impact,
            MetricKind::Mastery => &self.mastery,
            MetricKind::Endurance => &self.endurance,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricResult> {
        MetricKind::ALL.into_iter().map(move |kind| self.get(kind))
    }

    /// Highest-valued metric; the earlier kind in canonical order wins ties.
    pub fn strongest(&self) -> &MetricResult {
        let mut best = &self.productivity;
        for metric in self.iter().skip(1) {
            if metric.value > best.value {
                best = metric;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure derivation of a canonical record plus the weight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: f64,
    pub grade: Grade,
    pub percentile: u8,
    pub metrics: MetricSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(kind: MetricKind, value: f64) -> MetricResult {
        MetricResult {
            kind,
            label: kind.label().to_string(),
            value,
            description: kind.description().to_string(),
            rationale: String::new(),
        }
    }

    #[test]
    fn acceptance_rate_is_zero_without_finished_pull_requests() {
        let stats = PullRequestStats {
            total: 4,
            merged: 0,
            closed: 0,
            open: 4,
        };
        assert_eq!(stats.acceptance_rate(), 0.0);
    }

    #[test]
    fn acceptance_rate_handles_counts_at_the_integer_limit() {
        let stats = PullRequestStats {
            total: u64::MAX,
            merged: u64::MAX,
            closed: 1,
            open: 0,
        };
        let rate = stats.acceptance_rate();
        assert!((0.0..=1.0).contains(&rate));
        assert!(rate > 0.99);
    }

    #[test]
    fn acceptance_rate_uses_merged_over_finished() {
        let stats = PullRequestStats {
            total: 10,
            merged: 6,
            closed: 2,
            open: 2,
        };
        assert_eq!(stats.acceptance_rate(), 0.75);
    }

    #[test]
    fn strongest_prefers_canonical_order_on_ties() {
        let set = MetricSet {
            productivity: metric(MetricKind::Productivity, 4.0),
            reliability: metric(MetricKind::Reliability, 6.5),
            impact: metric(MetricKind::Impact, 6.5),
            mastery: metric(MetricKind::Mastery, 2.0),
            endurance: metric(MetricKind::Endurance, 6.4),
        };
        assert_eq!(set.strongest().kind, MetricKind::Reliability);
    }

    #[test]
    fn display_name_falls_back_to_login() {
        let created = DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        let mut record = CanonicalProfileRecord::new("octocat", created);
        assert_eq!(record.display_name(), "octocat");
        record.profile.name = Some("The Octocat".to_string());
        assert_eq!(record.display_name(), "The Octocat");
    }
}
