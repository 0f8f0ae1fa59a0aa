//! Reddit submissions via the public `submitted.json` listing.
//!
//! Window: `start <= created_utc <= end` (inclusive on both ends).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use weekstats_core::{
    DateRange, Platform, PlatformStats, RedditCredentials, RedditStats, RedditTopPost,
};

use crate::collector::Collector;
use crate::error::CollectorError;
use crate::http::{build_client, normalize_base, path_segment, read_json, HttpSettings, BROWSER_UA};

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const PAGE_LIMIT: &str = "100";

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    #[serde(default)]
    data: PostData,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct PostData {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) score: i64,
    #[serde(default)]
    pub(crate) num_comments: u64,
    #[serde(default)]
    pub(crate) subreddit: Option<String>,
    #[serde(default)]
    pub(crate) permalink: String,
    /// Seconds since the epoch, as a float.
    #[serde(default)]
    pub(crate) created_utc: f64,
}

impl PostData {
    #[allow(clippy::cast_possible_truncation)]
    fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis((self.created_utc * 1000.0).round() as i64)
    }
}

pub struct RedditCollector {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<RedditCredentials>,
}

impl RedditCollector {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: Option<RedditCredentials>,
        settings: &HttpSettings,
    ) -> Result<Self, CollectorError> {
        Self::with_base_url(credentials, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        credentials: Option<RedditCredentials>,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: normalize_base(base_url),
            credentials,
        })
    }

    async fn fetch_posts(&self, username: &str) -> Result<Vec<PostData>, CollectorError> {
        let url = format!(
            "{}/user/{}/submitted.json",
            self.base_url,
            path_segment(username)
        );
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, BROWSER_UA)
            .query(&[("limit", PAGE_LIMIT)])
            .send()
            .await?;

        let listing: Listing = read_json(response, "reddit submitted listing").await?;
        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }
}

impl Collector for RedditCollector {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    async fn collect(&self, range: &DateRange) -> Result<PlatformStats, CollectorError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(CollectorError::NotConfigured(Platform::Reddit))?;

        let posts = self.fetch_posts(&creds.username).await?;
        tracing::debug!(
            username = %creds.username,
            fetched = posts.len(),
            "fetched reddit submissions"
        );
        Ok(PlatformStats::Reddit(summarize_posts(&posts, range)))
    }
}

/// Reduce a listing to the window's totals, averages and per-subreddit tally.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn summarize_posts(posts: &[PostData], range: &DateRange) -> RedditStats {
    let mut stats = RedditStats::default();
    let mut top: Option<&PostData> = None;

    for post in posts {
        let Some(created) = post.created_at() else {
            continue;
        };
        if !range.contains(created) {
            continue;
        }

        stats.posts_count += 1;
        stats.karma += post.score;
        stats.comments += post.num_comments;

        let subreddit = post.subreddit.clone().unwrap_or_else(|| "unknown".to_string());
        let tally = stats.subreddits.entry(subreddit).or_default();
        tally.posts += 1;
        tally.karma += post.score;

        // First post wins ties.
        if top.is_none_or(|t| post.score > t.score) {
            top = Some(post);
        }
    }

    if stats.posts_count > 0 {
        stats.avg_karma = stats.karma as f64 / stats.posts_count as f64;
        stats.avg_comments = stats.comments as f64 / stats.posts_count as f64;
    }

    stats.top_post = top.map(|post| RedditTopPost {
        title: post.title.clone(),
        score: post.score,
        subreddit: post.subreddit.clone().unwrap_or_default(),
        url: format!("https://reddit.com{}", post.permalink),
    });

    stats
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn range() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 9, 22, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 9, 29, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[allow(clippy::cast_precision_loss)]
    fn post(title: &str, score: i64, comments: u64, sub: &str, at: DateTime<Utc>) -> PostData {
        PostData {
            title: title.to_string(),
            score,
            num_comments: comments,
            subreddit: Some(sub.to_string()),
            permalink: format!("/r/{sub}/comments/{title}"),
            created_utc: at.timestamp() as f64,
        }
    }

    #[test]
    fn boundary_posts_are_included_and_outside_posts_excluded() {
        let r = range();
        let posts = vec![
            post("at-start", 10, 1, "rust", r.start),
            post("at-end", 5, 3, "rust", r.end),
            post("before", 100, 0, "rust", r.start - chrono::Duration::seconds(1)),
            post("after", 100, 0, "rust", r.end + chrono::Duration::seconds(1)),
        ];

        let stats = summarize_posts(&posts, &r);
        assert_eq!(stats.posts_count, 2);
        assert_eq!(stats.karma, 15);
        assert_eq!(stats.comments, 4);
    }

    #[test]
    fn averages_top_post_and_subreddit_tally() {
        let r = range();
        let mid = r.start + chrono::Duration::days(2);
        let posts = vec![
            post("a", 4, 2, "rust", mid),
            post("b", 8, 0, "programming", mid),
            post("c", 8, 4, "rust", mid),
        ];

        let stats = summarize_posts(&posts, &r);
        assert!((stats.avg_karma - 20.0 / 3.0).abs() < 1e-9);
        assert!((stats.avg_comments - 2.0).abs() < 1e-9);

        let top = stats.top_post.expect("top post");
        assert_eq!(top.title, "b", "first of equal scores wins");
        assert_eq!(top.url, "https://reddit.com/r/programming/comments/b");

        assert_eq!(stats.subreddits["rust"].posts, 2);
        assert_eq!(stats.subreddits["rust"].karma, 12);
        assert_eq!(stats.subreddits["programming"].posts, 1);
    }

    #[test]
    fn empty_window_yields_default_record() {
        let stats = summarize_posts(&[], &range());
        assert_eq!(stats, RedditStats::default());
    }
}
