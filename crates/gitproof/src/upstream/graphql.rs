use super::normalizer::{
    activities, longest_streak, parse_created_at, present, require_username, top_repository,
    LanguageTally, UNKNOWN,
};
use super::{InvalidProfile, RawEvent};
use crate::scoring::{
    CanonicalProfileRecord, ProfileFields, PullRequestStats, RepositorySummary,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQlPayload {
    pub user: GraphQlUser,
    #[serde(default)]
    pub events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlUser {
    pub login: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<String>,
    pub followers: Option<TotalCount>,
    pub following: Option<TotalCount>,
    pub contributions_collection: Option<ContributionsCollection>,
    pub pull_requests: Option<TotalCount>,
    #[serde(rename = "mergedPRs")]
    pub merged_prs: Option<TotalCount>,
    #[serde(rename = "closedPRs")]
    pub closed_prs: Option<TotalCount>,
    #[serde(rename = "openPRs")]
    pub open_prs: Option<TotalCount>,
    pub repositories: Option<RepositoryConnection>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: Option<u64>,
}

fn count(value: &Option<TotalCount>) -> u64 {
    value
        .and_then(|connection| connection.total_count)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: Option<u64>,
    #[serde(default)]
    pub weeks: Option<Vec<ContributionWeek>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    #[serde(default)]
    pub contribution_days: Option<Vec<ContributionDay>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub contribution_count: Option<u64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Option<Vec<GraphQlRepository>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRepository {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stargazers_count: Option<u64>,
    pub fork_count: Option<u64>,
    pub url: Option<String>,
    pub languages: Option<LanguageConnection>,
}

impl GraphQlRepository {
    fn stars(&self) -> u64 {
        self.stargazers_count.unwrap_or(0)
    }

    fn language_edges(&self) -> &[LanguageEdge] {
        self.languages
            .as_ref()
            .and_then(|connection| connection.edges.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageConnection {
    #[serde(default)]
    pub edges: Option<Vec<LanguageEdge>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageEdge {
    pub size: Option<u64>,
    pub node: Option<LanguageNode>,
}

impl LanguageEdge {
    fn language(&self) -> Option<&str> {
        self.node
            .as_ref()
            .and_then(|node| node.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageNode {
    pub name: Option<String>,
}

pub(super) fn normalize(payload: &GraphQlPayload) -> Result<CanonicalProfileRecord, InvalidProfile> {
    let user = &payload.user;
    let username = require_username(&user.login)?;
    let account_created_at = parse_created_at(&username, &user.created_at)?;

    let nodes: &[GraphQlRepository] = user
        .repositories
        .as_ref()
        .and_then(|connection| connection.nodes.as_deref())
        .unwrap_or_default();

    let mut tally = LanguageTally::default();
    for repository in nodes {
        for edge in repository.language_edges() {
            if let Some(language) = edge.language() {
                tally.add(language, edge.size.unwrap_or(0));
            }
        }
    }

    let total_stars = nodes
        .iter()
        .map(GraphQlRepository::stars)
        .fold(0u64, u64::saturating_add);
    let top_repository = top_repository(nodes.iter().map(|repository| {
        let name = repository.name.clone().unwrap_or_default();
        (format!("{username}/{name}"), repository.stars())
    }));

    let calendar = user
        .contributions_collection
        .as_ref()
        .and_then(|collection| collection.contribution_calendar.as_ref());
    let total_contributions = calendar.map(|calendar| calendar.total_contributions.unwrap_or(0));
    let longest = calendar.map(|calendar| {
        let days = calendar
            .weeks
            .iter()
            .flatten()
            .flat_map(|week| week.contribution_days.iter().flatten())
            .map(|day| day.contribution_count.unwrap_or(0));
        longest_streak(days)
    });

    let has_pull_request_data = user.pull_requests.is_some()
        || user.merged_prs.is_some()
        || user.closed_prs.is_some()
        || user.open_prs.is_some();
    let pull_requests = has_pull_request_data.then(|| PullRequestStats {
        total: count(&user.pull_requests),
        merged: count(&user.merged_prs),
        closed: count(&user.closed_prs),
        open: count(&user.open_prs),
    });

    let repositories = nodes
        .iter()
        .map(|repository| summarize_repository(&username, repository))
        .collect();

    Ok(CanonicalProfileRecord {
        avatar_url: present(&user.avatar_url),
        account_created_at,
        followers: count(&user.followers),
        following: count(&user.following),
        public_repo_count: nodes.len() as u64,
        total_contributions,
        longest_streak: longest,
        pull_requests,
        total_stars,
        top_languages: tally.ranked(),
        top_repository,
        profile: ProfileFields {
            name: present(&user.name),
            bio: present(&user.bio),
            location: present(&user.location),
            company: present(&user.company),
            email: present(&user.email),
            blog: None,
            twitter_username: None,
            hireable: None,
        },
        repositories,
        recent_activity: activities(payload.events.as_deref().unwrap_or_default()),
        username,
    })
}

fn summarize_repository(login: &str, repository: &GraphQlRepository) -> RepositorySummary {
    let name = present(&repository.name).unwrap_or_else(|| UNKNOWN.to_string());
    let edges = repository.language_edges();
    RepositorySummary {
        full_name: format!("{login}/{name}"),
        description: repository.description.clone().unwrap_or_default(),
        language: edges
            .first()
            .and_then(LanguageEdge::language)
            .unwrap_or(UNKNOWN)
            .to_string(),
        stars: repository.stars(),
        forks: repository.fork_count.unwrap_or(0),
        url: repository.url.clone().unwrap_or_default(),
        tech_stack_count: edges.len().max(1) as u32,
        name,
    }
}
