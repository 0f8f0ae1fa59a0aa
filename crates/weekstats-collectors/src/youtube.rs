//! `YouTube` channel uploads.
//!
//! With an API key: Data API v3 search for the window, then one batched
//! `videos?part=statistics` call. Without a key, or when the API path fails,
//! the public channel page is scraped for the subscriber count only.

use regex::Regex;
use serde::Deserialize;
use weekstats_core::{DateRange, Platform, PlatformStats, YouTubeCredentials, YouTubeStats};

use crate::collector::Collector;
use crate::error::CollectorError;
use crate::http::{
    build_client, ensure_success, normalize_base, path_segment, read_json, HttpSettings,
    BROWSER_UA,
};

const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
const DEFAULT_PAGE_BASE: &str = "https://www.youtube.com";
const SEARCH_MAX_RESULTS: &str = "50";
const PLACEHOLDER_KEY: &str = "your_youtube_api_key_here";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    statistics: VideoStatistics,
}

/// The Data API returns counts as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoStatistics {
    pub(crate) view_count: Option<String>,
    pub(crate) like_count: Option<String>,
    pub(crate) comment_count: Option<String>,
}

pub struct YouTubeCollector {
    client: reqwest::Client,
    api_base: String,
    page_base: String,
    credentials: Option<YouTubeCredentials>,
}

impl YouTubeCollector {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: Option<YouTubeCredentials>,
        settings: &HttpSettings,
    ) -> Result<Self, CollectorError> {
        Self::with_base_urls(credentials, settings, DEFAULT_API_BASE, DEFAULT_PAGE_BASE)
    }

    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn with_base_urls(
        credentials: Option<YouTubeCredentials>,
        settings: &HttpSettings,
        api_base: &str,
        page_base: &str,
    ) -> Result<Self, CollectorError> {
        Ok(Self {
            client: build_client(settings)?,
            api_base: normalize_base(api_base),
            page_base: normalize_base(page_base),
            credentials,
        })
    }

    async fn collect_via_api(
        &self,
        api_key: &str,
        channel_id: &str,
        range: &DateRange,
    ) -> Result<YouTubeStats, CollectorError> {
        let after = range.start_rfc3339();
        let before = range.end_rfc3339();
        let response = self
            .client
            .get(format!("{}/youtube/v3/search", self.api_base))
            .query(&[
                ("key", api_key),
                ("channelId", channel_id),
                ("part", "id"),
                ("type", "video"),
                ("order", "date"),
                ("maxResults", SEARCH_MAX_RESULTS),
                ("publishedAfter", after.as_str()),
                ("publishedBefore", before.as_str()),
            ])
            .send()
            .await?;
        let search: SearchResponse = read_json(response, "youtube search").await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if ids.is_empty() {
            return Ok(YouTubeStats::default());
        }

        let joined = ids.join(",");
        let response = self
            .client
            .get(format!("{}/youtube/v3/videos", self.api_base))
            .query(&[("key", api_key), ("part", "statistics"), ("id", joined.as_str())])
            .send()
            .await?;
        let videos: VideosResponse = read_json(response, "youtube video statistics").await?;

        let statistics: Vec<VideoStatistics> =
            videos.items.into_iter().map(|v| v.statistics).collect();
        Ok(summarize(ids.len(), &statistics))
    }

    async fn collect_via_scrape(&self, channel_id: &str) -> Result<YouTubeStats, CollectorError> {
        let url = channel_page_url(&self.page_base, channel_id);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, BROWSER_UA)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;
        let html = ensure_success(response)?.text().await?;

        let subscribers = parse_subscriber_count(&html).unwrap_or(0);
        tracing::info!(
            channel = channel_id,
            subscribers,
            "scraped youtube channel page; videos and views need an API key"
        );
        Ok(YouTubeStats {
            subscribers: Some(subscribers),
            ..YouTubeStats::default()
        })
    }
}

impl Collector for YouTubeCollector {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn collect(&self, range: &DateRange) -> Result<PlatformStats, CollectorError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(CollectorError::NotConfigured(Platform::YouTube))?;

        let api_key = creds
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_KEY);

        if let Some(key) = api_key {
            match self.collect_via_api(key, &creds.channel_id, range).await {
                Ok(stats) => return Ok(PlatformStats::YouTube(stats)),
                Err(e) => {
                    tracing::warn!(error = %e, "youtube API failed; falling back to page scrape");
                }
            }
        }

        let stats = self.collect_via_scrape(&creds.channel_id).await?;
        Ok(PlatformStats::YouTube(stats))
    }
}

/// `@handle` maps to `/@handle/videos`, anything else to `/channel/{id}/videos`.
pub(crate) fn channel_page_url(base: &str, channel_id: &str) -> String {
    match channel_id.strip_prefix('@') {
        Some(handle) => format!("{base}/@{}/videos", path_segment(handle)),
        None => format!("{base}/channel/{}/videos", path_segment(channel_id)),
    }
}

/// Pull the subscriber count out of a channel page, expanding `K`/`M`/`B`.
#[must_use]
pub(crate) fn parse_subscriber_count(html: &str) -> Option<u64> {
    let re = Regex::new(r#""subscriberCountText":\{"simpleText":"([\d.,KMB]+)\s+subscribers?""#)
        .expect("valid subscriber regex");
    let caps = re.captures(html)?;
    parse_abbreviated(caps.get(1)?.as_str())
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn parse_abbreviated(text: &str) -> Option<u64> {
    let text = text.replace(',', "");
    let (number, multiplier) = match text.chars().last()? {
        'K' => (&text[..text.len() - 1], 1_000_f64),
        'M' => (&text[..text.len() - 1], 1_000_000_f64),
        'B' => (&text[..text.len() - 1], 1_000_000_000_f64),
        _ => (text.as_str(), 1_f64),
    };
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

fn count(value: Option<&String>) -> u64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn summarize(videos_count: usize, statistics: &[VideoStatistics]) -> YouTubeStats {
    let mut stats = YouTubeStats {
        videos_count: videos_count as u64,
        ..YouTubeStats::default()
    };
    for s in statistics {
        stats.views += count(s.view_count.as_ref());
        stats.likes += count(s.like_count.as_ref());
        stats.comments += count(s.comment_count.as_ref());
    }
    if stats.videos_count > 0 {
        stats.avg_views = stats.views as f64 / stats.videos_count as f64;
    }
    stats
}
