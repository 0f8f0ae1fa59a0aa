//! GitHub profile, repository totals and push activity.
//!
//! Three independent requests. A non-2xx on any of them is logged and that
//! part contributes zeros; transport errors still fail the collection.
//! Events are kept when `start <= created_at <= end`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use weekstats_core::{
    DateRange, GitHubActivity, GitHubCredentials, GitHubStats, Platform, PlatformStats,
};

use crate::collector::Collector;
use crate::error::CollectorError;
use crate::http::{build_client, normalize_base, path_segment, read_json_or_skip, HttpSettings};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const PER_PAGE: &str = "100";

#[derive(Debug, Default, Deserialize)]
struct Profile {
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Repo {
    #[serde(default)]
    pub(crate) stargazers_count: u64,
    #[serde(default)]
    pub(crate) forks_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Event {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) repo: EventRepo,
    pub(crate) created_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) payload: EventPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EventRepo {
    pub(crate) name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EventPayload {
    #[serde(default)]
    pub(crate) commits: Vec<serde_json::Value>,
}

pub struct GitHubCollector {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<GitHubCredentials>,
}

impl GitHubCollector {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: Option<GitHubCredentials>,
        settings: &HttpSettings,
    ) -> Result<Self, CollectorError> {
        Self::with_base_url(credentials, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        credentials: Option<GitHubCredentials>,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: normalize_base(base_url),
            credentials,
        })
    }

    async fn get_or_skip<T>(
        &self,
        creds: &GitHubCredentials,
        path: &str,
        context: &str,
    ) -> Result<Option<T>, CollectorError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!(
            "{}/users/{}{path}",
            self.base_url,
            path_segment(&creds.username)
        );
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &creds.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {token}"));
        }
        if !path.is_empty() {
            request = request.query(&[("per_page", PER_PAGE)]);
        }
        let response = request.send().await?;
        read_json_or_skip(response, context).await
    }
}

impl Collector for GitHubCollector {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn collect(&self, range: &DateRange) -> Result<PlatformStats, CollectorError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(CollectorError::NotConfigured(Platform::GitHub))?;

        let profile: Profile = self
            .get_or_skip(creds, "", "github profile")
            .await?
            .unwrap_or_default();
        let repos: Vec<Repo> = self
            .get_or_skip(creds, "/repos", "github repositories")
            .await?
            .unwrap_or_default();
        let events: Vec<Event> = self
            .get_or_skip(creds, "/events", "github events")
            .await?
            .unwrap_or_default();

        let mut stats = GitHubStats {
            public_repos: profile.public_repos,
            followers: profile.followers,
            following: profile.following,
            ..GitHubStats::default()
        };
        add_repo_totals(&mut stats, &repos);
        add_activity(&mut stats, &events, range);
        Ok(PlatformStats::GitHub(stats))
    }
}

pub(crate) fn add_repo_totals(stats: &mut GitHubStats, repos: &[Repo]) {
    stats.total_stars = repos.iter().map(|r| r.stargazers_count).sum();
    stats.total_forks = repos.iter().map(|r| r.forks_count).sum();
}

pub(crate) fn add_activity(stats: &mut GitHubStats, events: &[Event], range: &DateRange) {
    for event in events.iter().filter(|e| range.contains(e.created_at)) {
        if event.kind == "PushEvent" {
            stats.commits_count += event.payload.commits.len() as u64;
        }
        stats.recent_activity.push(GitHubActivity {
            kind: event.kind.clone(),
            repo: event.repo.name.clone(),
            created_at: event.created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        });
    }
}
