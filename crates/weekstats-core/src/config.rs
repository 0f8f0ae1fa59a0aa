use std::net::SocketAddr;
use std::path::PathBuf;

use crate::app_config::{
    AppConfig, GitHubCredentials, GscCredentials, LinkedInCredentials, RedditCredentials,
    TwitterCredentials, YouTubeCredentials,
};
use crate::ConfigError;

/// Value shipped in the sample `.env`; treated the same as an unset key.
const YOUTUBE_PLACEHOLDER_KEY: &str = "your_youtube_api_key_here";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Platform credentials are all optional: a platform whose variables are
/// missing (or empty) is left as `None` and reported as not configured.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let bind_raw = or_default("WEEKSTATS_BIND_ADDR", "0.0.0.0:5000");
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "WEEKSTATS_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let timeout_raw = or_default("WEEKSTATS_REQUEST_TIMEOUT_SECS", "10");
    let request_timeout_secs = timeout_raw
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "WEEKSTATS_REQUEST_TIMEOUT_SECS".to_string(),
            reason: e.to_string(),
        })?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "WEEKSTATS_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let log_level = or_default("WEEKSTATS_LOG_LEVEL", "info");
    let user_agent = or_default("WEEKSTATS_USER_AGENT", "weekstats/0.1 (engagement-report)");

    let reddit = optional("REDDIT_USERNAME").map(|username| RedditCredentials { username });

    let linkedin = match (
        optional("LINKEDIN_ACCESS_TOKEN"),
        optional("LINKEDIN_ORGANIZATION_ID"),
    ) {
        (Some(access_token), Some(organization_id)) => Some(LinkedInCredentials {
            access_token,
            organization_id,
        }),
        _ => None,
    };

    let twitter = match (optional("TWITTER_BEARER_TOKEN"), optional("TWITTER_USERNAME")) {
        (Some(bearer_token), Some(username)) => Some(TwitterCredentials {
            bearer_token,
            username: username.trim_start_matches('@').to_string(),
        }),
        _ => None,
    };

    let youtube = optional("YOUTUBE_CHANNEL_ID").map(|channel_id| YouTubeCredentials {
        api_key: optional("YOUTUBE_API_KEY").filter(|k| k != YOUTUBE_PLACEHOLDER_KEY),
        channel_id,
    });

    let gsc = match (optional("GSC_CREDENTIALS_FILE"), optional("GSC_PROPERTY_URL")) {
        (Some(file), Some(property_url)) => Some(GscCredentials {
            credentials_file: PathBuf::from(file),
            property_url,
        }),
        _ => None,
    };

    let github = optional("GITHUB_USERNAME").map(|username| GitHubCredentials {
        username,
        token: optional("GITHUB_TOKEN"),
    });

    Ok(AppConfig {
        bind_addr,
        log_level,
        request_timeout_secs,
        user_agent,
        reddit,
        linkedin,
        twitter,
        youtube,
        gsc,
        github,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
