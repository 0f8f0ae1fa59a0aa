//! Shared types and configuration for the weekly engagement report.
//!
//! Collectors, the CLI and the dashboard all speak in terms of the types
//! defined here: [`Platform`] identifiers, the [`DateRange`] a report covers,
//! the per-platform statistics records and the assembled [`Report`].

pub mod app_config;
pub mod config;
pub mod export;
pub mod metrics;
pub mod platform;
pub mod range;
pub mod report;
pub mod stats;

use thiserror::Error;

pub use app_config::{
    AppConfig, GitHubCredentials, GscCredentials, LinkedInCredentials, RedditCredentials,
    TwitterCredentials, YouTubeCredentials,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use export::{default_filename, export_csv, print_summary, write_csv, CSV_HEADER};
pub use metrics::{click_through_rate, engagement_rate};
pub use platform::{ParsePlatformError, Platform};
pub use range::{DateRange, RangeError};
pub use report::{PlatformReport, Report, ReportStatus};
pub use stats::{
    CsvRow, GitHubActivity, GitHubStats, GscStats, LinkedInStats, PlatformStats, RedditStats,
    RedditTopPost, SubredditTally, TwitterStats, YouTubeStats,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
