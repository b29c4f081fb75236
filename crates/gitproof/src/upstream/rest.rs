use super::normalizer::{
    activities, parse_created_at, present, require_username, top_repository, LanguageTally,
    UNKNOWN,
};
use super::{InvalidProfile, RawEvent};
use crate::scoring::{CanonicalProfileRecord, ProfileFields, RepositorySummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestPayload {
    pub user: RestUser,
    #[serde(default)]
    pub repos: Option<Vec<RestRepository>>,
    #[serde(default)]
    pub events: Option<Vec<RawEvent>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestUser {
    pub login: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    pub hireable: Option<bool>,
    pub created_at: Option<String>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub public_repos: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestRepository {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub html_url: Option<String>,
}

impl RestRepository {
    fn stars(&self) -> u64 {
        self.stargazers_count.unwrap_or(0)
    }

    fn full_name(&self, login: &str) -> String {
        present(&self.full_name).unwrap_or_else(|| {
            let name = present(&self.name).unwrap_or_else(|| UNKNOWN.to_string());
            format!("{login}/{name}")
        })
    }
}

/// REST carries no contribution calendar or PR counters; those stay unknown.
pub(super) fn normalize(payload: &RestPayload) -> Result<CanonicalProfileRecord, InvalidProfile> {
    let user = &payload.user;
    let username = require_username(&user.login)?;
    let account_created_at = parse_created_at(&username, &user.created_at)?;

    let repos: &[RestRepository] = payload.repos.as_deref().unwrap_or_default();

    let mut tally = LanguageTally::default();
    for repository in repos {
        if let Some(language) = present(&repository.language) {
            tally.add(&language, 1);
        }
    }

    let total_stars = repos
        .iter()
        .map(RestRepository::stars)
        .fold(0u64, u64::saturating_add);
    let top_repository = top_repository(
        repos
            .iter()
            .map(|repository| (repository.full_name(&username), repository.stars())),
    );

    let repositories = repos
        .iter()
        .map(|repository| RepositorySummary {
            name: present(&repository.name).unwrap_or_else(|| UNKNOWN.to_string()),
            full_name: repository.full_name(&username),
            description: repository.description.clone().unwrap_or_default(),
            language: present(&repository.language).unwrap_or_else(|| UNKNOWN.to_string()),
            stars: repository.stars(),
            forks: repository.forks_count.unwrap_or(0),
            url: repository.html_url.clone().unwrap_or_default(),
            tech_stack_count: 1,
        })
        .collect();

    Ok(CanonicalProfileRecord {
        avatar_url: present(&user.avatar_url),
        account_created_at,
        followers: user.followers.unwrap_or(0),
        following: user.following.unwrap_or(0),
        public_repo_count: user.public_repos.unwrap_or(0),
        total_contributions: None,
        longest_streak: None,
        pull_requests: None,
        total_stars,
        top_languages: tally.ranked(),
        top_repository,
        profile: ProfileFields {
            name: present(&user.name),
            bio: present(&user.bio),
            location: present(&user.location),
            company: present(&user.company),
            email: present(&user.email),
            blog: present(&user.blog),
            twitter_username: present(&user.twitter_username),
            hireable: user.hireable,
        },
        repositories,
        recent_activity: activities(payload.events.as_deref().unwrap_or_default()),
        username,
    })
}
