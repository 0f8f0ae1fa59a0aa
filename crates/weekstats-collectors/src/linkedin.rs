//! `LinkedIn` organization posts and share statistics.
//!
//! Window: `start_ms <= created.time <= end_ms` (inclusive on both ends).
//! Share statistics are fetched per post; a failed lookup is logged at debug
//! and the post still counts towards `posts_count`.

use serde::Deserialize;
use weekstats_core::{
    engagement_rate, DateRange, LinkedInCredentials, LinkedInStats, Platform, PlatformStats,
};

use crate::collector::Collector;
use crate::error::CollectorError;
use crate::http::{build_client, normalize_base, read_json, HttpSettings};

const DEFAULT_BASE_URL: &str = "https://api.linkedin.com";
const POST_COUNT: &str = "100";

#[derive(Debug, Deserialize)]
struct UgcPostsResponse {
    #[serde(default)]
    elements: Vec<UgcPost>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UgcPost {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) created: Created,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Created {
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub(crate) time: i64,
}

#[derive(Debug, Deserialize)]
struct ShareStatisticsResponse {
    #[serde(default)]
    elements: Vec<ShareStatisticsElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareStatisticsElement {
    #[serde(default)]
    total_share_statistics: ShareCounts,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShareCounts {
    #[serde(default)]
    pub(crate) like_count: u64,
    #[serde(default)]
    pub(crate) comment_count: u64,
    #[serde(default)]
    pub(crate) share_count: u64,
    #[serde(default)]
    pub(crate) impression_count: u64,
}

pub struct LinkedInCollector {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<LinkedInCredentials>,
}

impl LinkedInCollector {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: Option<LinkedInCredentials>,
        settings: &HttpSettings,
    ) -> Result<Self, CollectorError> {
        Self::with_base_url(credentials, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        credentials: Option<LinkedInCredentials>,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: normalize_base(base_url),
            credentials,
        })
    }

    fn get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .header("X-Restli-Protocol-Version", "2.0.0")
    }

    async fn fetch_posts(&self, creds: &LinkedInCredentials) -> Result<Vec<UgcPost>, CollectorError> {
        let authors = format!("List({})", org_urn(&creds.organization_id));
        let response = self
            .get("/v2/ugcPosts", &creds.access_token)
            .query(&[("q", "authors"), ("authors", authors.as_str()), ("count", POST_COUNT)])
            .send()
            .await?;

        let body: UgcPostsResponse = read_json(response, "linkedin ugcPosts").await?;
        Ok(body.elements)
    }

    async fn fetch_share_counts(
        &self,
        creds: &LinkedInCredentials,
        post_id: &str,
    ) -> Result<Vec<ShareCounts>, CollectorError> {
        let urn = org_urn(&creds.organization_id);
        let shares = format!("List({post_id})");
        let response = self
            .get("/v2/organizationalEntityShareStatistics", &creds.access_token)
            .query(&[
                ("q", "organizationalEntity"),
                ("organizationalEntity", urn.as_str()),
                ("shares", shares.as_str()),
            ])
            .send()
            .await?;

        let body: ShareStatisticsResponse =
            read_json(response, "linkedin share statistics").await?;
        Ok(body
            .elements
            .into_iter()
            .map(|e| e.total_share_statistics)
            .collect())
    }
}

fn org_urn(organization_id: &str) -> String {
    format!("urn:li:organization:{organization_id}")
}

impl Collector for LinkedInCollector {
    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }

    async fn collect(&self, range: &DateRange) -> Result<PlatformStats, CollectorError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(CollectorError::NotConfigured(Platform::LinkedIn))?;

        let posts = self.fetch_posts(creds).await?;
        let in_window = posts_in_window(&posts, range);

        let mut counts = Vec::new();
        for post in &in_window {
            match self.fetch_share_counts(creds, &post.id).await {
                Ok(c) => counts.extend(c),
                Err(e) => {
                    tracing::debug!(post_id = %post.id, error = %e, "share statistics unavailable");
                }
            }
        }

        Ok(PlatformStats::LinkedIn(summarize(in_window.len(), &counts)))
    }
}

pub(crate) fn posts_in_window<'a>(posts: &'a [UgcPost], range: &DateRange) -> Vec<&'a UgcPost> {
    let start_ms = range.start.timestamp_millis();
    let end_ms = range.end.timestamp_millis();
    posts
        .iter()
        .filter(|p| start_ms <= p.created.time && p.created.time <= end_ms)
        .collect()
}

pub(crate) fn summarize(posts_count: usize, counts: &[ShareCounts]) -> LinkedInStats {
    let mut stats = LinkedInStats {
        posts_count: posts_count as u64,
        ..LinkedInStats::default()
    };
    for c in counts {
        stats.likes += c.like_count;
        stats.comments += c.comment_count;
        stats.shares += c.share_count;
        stats.impressions += c.impression_count;
    }
    stats.engagement_rate = engagement_rate(
        stats.likes + stats.comments + stats.shares,
        stats.impressions,
    );
    stats
}
