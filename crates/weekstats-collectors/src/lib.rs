//! Platform collectors for the weekly engagement report.
//!
//! Each collector wraps one external API behind the [`Collector`] trait and
//! reduces its response to a statistics record for a [`DateRange`]. Collectors
//! return `Result`; [`collect_or_default`] is the single place where failures
//! are logged and turned into empty records, so one platform can never sink
//! the whole report.
//!
//! [`DateRange`]: weekstats_core::DateRange

pub mod aggregate;
pub mod collector;
pub mod error;
pub mod github;
pub mod gsc;
pub mod linkedin;
pub mod reddit;
pub mod twitter;
pub mod youtube;

mod http;

pub use aggregate::{collect_all, resolve_platforms, Collectors};
pub use collector::{collect_or_default, Collector};
pub use error::CollectorError;
pub use github::GitHubCollector;
pub use gsc::GscCollector;
pub use http::HttpSettings;
pub use linkedin::LinkedInCollector;
pub use reddit::RedditCollector;
pub use twitter::TwitterCollector;
pub use youtube::YouTubeCollector;
