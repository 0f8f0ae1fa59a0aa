use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every platform the report knows how to collect from.
///
/// Declaration order is the canonical report order; `Ord` follows it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    LinkedIn,
    Twitter,
    YouTube,
    Gsc,
    GitHub,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform: {0}")]
pub struct ParsePlatformError(pub String);

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Reddit,
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::YouTube,
        Platform::Gsc,
        Platform::GitHub,
    ];

    /// Identifier used on the command line, in query strings and as report keys.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
            Platform::YouTube => "youtube",
            Platform::Gsc => "gsc",
            Platform::GitHub => "github",
        }
    }

    /// Label written to the `Channel` column of the CSV export.
    #[must_use]
    pub fn channel_label(self) -> &'static str {
        match self {
            Platform::Reddit => "reddit",
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "x",
            Platform::YouTube => "youtube",
            Platform::Gsc => "google search console",
            Platform::GitHub => "github",
        }
    }

    /// Human-facing name for the dashboard.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Reddit => "Reddit",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitter => "X (Twitter)",
            Platform::YouTube => "YouTube",
            Platform::Gsc => "Google Search Console",
            Platform::GitHub => "GitHub",
        }
    }

    /// Resolve a list of user-supplied identifiers, dropping unknown ones.
    ///
    /// Duplicates collapse and the result is in canonical order.
    pub fn select<S: AsRef<str>>(ids: &[S]) -> Vec<Platform> {
        let mut selected: Vec<Platform> = ids
            .iter()
            .filter_map(|id| id.as_ref().parse::<Platform>().ok())
            .collect();
        selected.sort();
        selected.dedup();
        selected
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reddit" => Ok(Platform::Reddit),
            "linkedin" => Ok(Platform::LinkedIn),
            "twitter" | "x" => Ok(Platform::Twitter),
            "youtube" => Ok(Platform::YouTube),
            "gsc" | "google search console" => Ok(Platform::Gsc),
            "github" => Ok(Platform::GitHub),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}
