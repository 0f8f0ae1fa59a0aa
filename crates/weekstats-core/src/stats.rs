//! Per-platform statistics records.
//!
//! Each record's `Default` is the documented empty record returned when a
//! platform is unconfigured or its collection fails: every counter at zero,
//! every optional field `None`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Platform;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditTopPost {
    pub title: String,
    pub score: i64,
    pub subreddit: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubredditTally {
    pub posts: u64,
    pub karma: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditStats {
    pub posts_count: u64,
    /// Sum of post scores; can go negative.
    pub karma: i64,
    pub comments: u64,
    pub avg_karma: f64,
    pub avg_comments: f64,
    pub top_post: Option<RedditTopPost>,
    pub subreddits: BTreeMap<String, SubredditTally>,
}

/// `#[serde(default)]` tolerates records missing newer fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInStats {
    pub posts_count: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub impressions: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwitterStats {
    pub posts_count: u64,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub impressions: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YouTubeStats {
    pub videos_count: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub avg_views: f64,
    /// Only known on the page-scrape path.
    pub subscribers: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GscStats {
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub clicks_us: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubStats {
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub commits_count: u64,
    pub recent_activity: Vec<GitHubActivity>,
}

/// A statistics record from any platform.
///
/// Serializes untagged, so the JSON form is the flat record itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlatformStats {
    Reddit(RedditStats),
    LinkedIn(LinkedInStats),
    Twitter(TwitterStats),
    YouTube(YouTubeStats),
    Gsc(GscStats),
    GitHub(GitHubStats),
}

/// One line of the CSV export. `None` renders as an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub channel: String,
    pub posts_count: u64,
    pub karma: Option<i64>,
    pub impressions: Option<u64>,
    pub ctr: Option<f64>,
    pub likes: Option<u64>,
    pub clicks_us: Option<u64>,
}

impl CsvRow {
    /// A row with only the channel and post count filled in.
    #[must_use]
    pub fn posts_only(channel: impl Into<String>, posts_count: u64) -> Self {
        Self {
            channel: channel.into(),
            posts_count,
            karma: None,
            impressions: None,
            ctr: None,
            likes: None,
            clicks_us: None,
        }
    }
}

impl PlatformStats {
    /// The empty record for `platform`.
    #[must_use]
    pub fn empty(platform: Platform) -> Self {
        match platform {
            Platform::Reddit => Self::Reddit(RedditStats::default()),
            Platform::LinkedIn => Self::LinkedIn(LinkedInStats::default()),
            Platform::Twitter => Self::Twitter(TwitterStats::default()),
            Platform::YouTube => Self::YouTube(YouTubeStats::default()),
            Platform::Gsc => Self::Gsc(GscStats::default()),
            Platform::GitHub => Self::GitHub(GitHubStats::default()),
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Self::Reddit(_) => Platform::Reddit,
            Self::LinkedIn(_) => Platform::LinkedIn,
            Self::Twitter(_) => Platform::Twitter,
            Self::YouTube(_) => Platform::YouTube,
            Self::Gsc(_) => Platform::Gsc,
            Self::GitHub(_) => Platform::GitHub,
        }
    }

    /// Items published in the window. Search Console has no posts.
    #[must_use]
    pub fn posts_count(&self) -> u64 {
        match self {
            Self::Reddit(s) => s.posts_count,
            Self::LinkedIn(s) => s.posts_count,
            Self::Twitter(s) => s.posts_count,
            Self::YouTube(s) => s.videos_count,
            Self::Gsc(_) => 0,
            Self::GitHub(s) => s.commits_count,
        }
    }

    /// Project the record onto the fixed CSV columns.
    #[must_use]
    pub fn csv_row(&self) -> CsvRow {
        let mut row = CsvRow::posts_only(self.platform().channel_label(), self.posts_count());
        match self {
            Self::Reddit(s) => row.karma = Some(s.karma),
            Self::LinkedIn(s) => {
                row.impressions = Some(s.impressions);
                row.likes = Some(s.likes);
            }
            Self::Twitter(s) => {
                row.impressions = Some(s.impressions);
                row.likes = Some(s.likes);
            }
            Self::YouTube(s) => {
                row.impressions = Some(s.views);
                row.likes = Some(s.likes);
            }
            Self::Gsc(s) => {
                row.impressions = Some(s.impressions);
                row.ctr = Some(s.ctr);
                row.clicks_us = Some(s.clicks_us);
            }
            Self::GitHub(_) => {}
        }
        row
    }
}
