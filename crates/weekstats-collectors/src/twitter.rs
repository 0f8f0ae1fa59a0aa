//! X (Twitter) API v2 timeline for one account.
//!
//! The window goes to the API as `start_time`/`end_time`; tweets carrying a
//! `created_at` are rechecked client-side against the inclusive window.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::OnceCell;
use weekstats_core::{
    engagement_rate, DateRange, Platform, PlatformStats, TwitterCredentials, TwitterStats,
};

use crate::collector::Collector;
use crate::error::CollectorError;
use crate::http::{build_client, normalize_base, path_segment, read_json, HttpSettings};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const MAX_RESULTS: &str = "100";
const TWEET_FIELDS: &str = "public_metrics,created_at";

#[derive(Debug, Deserialize)]
struct UserLookup {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(default)]
    data: Option<Vec<Tweet>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Tweet {
    #[serde(default)]
    pub(crate) created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) public_metrics: PublicMetrics,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct PublicMetrics {
    #[serde(default)]
    pub(crate) like_count: u64,
    #[serde(default)]
    pub(crate) retweet_count: u64,
    #[serde(default)]
    pub(crate) reply_count: u64,
    #[serde(default)]
    pub(crate) impression_count: u64,
}

pub struct TwitterCollector {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<TwitterCredentials>,
    /// Resolved once per collector; the username never changes.
    user_id: OnceCell<String>,
}

impl TwitterCollector {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: Option<TwitterCredentials>,
        settings: &HttpSettings,
    ) -> Result<Self, CollectorError> {
        Self::with_base_url(credentials, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        credentials: Option<TwitterCredentials>,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: normalize_base(base_url),
            credentials,
            user_id: OnceCell::new(),
        })
    }

    async fn user_id(&self, creds: &TwitterCredentials) -> Result<&str, CollectorError> {
        let id = self
            .user_id
            .get_or_try_init(|| async {
                let url = format!(
                    "{}/2/users/by/username/{}",
                    self.base_url,
                    path_segment(&creds.username)
                );
                let response = self
                    .client
                    .get(&url)
                    .bearer_auth(&creds.bearer_token)
                    .send()
                    .await?;
                let lookup: UserLookup = read_json(response, "twitter user lookup").await?;
                let user = lookup.data.ok_or_else(|| {
                    CollectorError::Parse(format!("no X user named {}", creds.username))
                })?;
                tracing::debug!(username = %creds.username, user_id = %user.id, "resolved X user id");
                Ok::<_, CollectorError>(user.id)
            })
            .await?;
        Ok(id.as_str())
    }

    async fn fetch_tweets(
        &self,
        creds: &TwitterCredentials,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Tweet>, CollectorError> {
        let url = format!("{}/2/users/{}/tweets", self.base_url, path_segment(user_id));
        let start = range.start_rfc3339();
        let end = range.end_rfc3339();
        let response = self
            .client
            .get(&url)
            .bearer_auth(&creds.bearer_token)
            .query(&[
                ("start_time", start.as_str()),
                ("end_time", end.as_str()),
                ("max_results", MAX_RESULTS),
                ("tweet.fields", TWEET_FIELDS),
            ])
            .send()
            .await?;

        let timeline: Timeline = read_json(response, "twitter user tweets").await?;
        Ok(timeline.data.unwrap_or_default())
    }
}

impl Collector for TwitterCollector {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn collect(&self, range: &DateRange) -> Result<PlatformStats, CollectorError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(CollectorError::NotConfigured(Platform::Twitter))?;

        let user_id = self.user_id(creds).await?;
        let tweets = self.fetch_tweets(creds, user_id, range).await?;
        Ok(PlatformStats::Twitter(summarize(&tweets, range)))
    }
}

pub(crate) fn summarize(tweets: &[Tweet], range: &DateRange) -> TwitterStats {
    let mut stats = TwitterStats::default();
    for tweet in tweets {
        if tweet.created_at.is_some_and(|at| !range.contains(at)) {
            continue;
        }
        let m = tweet.public_metrics;
        stats.posts_count += 1;
        stats.likes += m.like_count;
        stats.retweets += m.retweet_count;
        stats.replies += m.reply_count;
        stats.impressions += m.impression_count;
    }
    stats.engagement_rate = engagement_rate(
        stats.likes + stats.retweets + stats.replies,
        stats.impressions,
    );
    stats
}
