use std::net::SocketAddr;
use std::path::PathBuf;

use crate::Platform;

/// Public Reddit profile; the submitted listing needs no auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditCredentials {
    pub username: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct LinkedInCredentials {
    pub access_token: String,
    pub organization_id: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct TwitterCredentials {
    pub bearer_token: String,
    pub username: String,
}

/// `channel_id` is either a `UC...` channel id or an `@handle`.
///
/// `api_key` is optional: without it the collector scrapes the public
/// channel page instead of calling the Data API.
#[derive(Clone, PartialEq, Eq)]
pub struct YouTubeCredentials {
    pub api_key: Option<String>,
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GscCredentials {
    pub credentials_file: PathBuf,
    pub property_url: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GitHubCredentials {
    pub username: String,
    pub token: Option<String>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub reddit: Option<RedditCredentials>,
    pub linkedin: Option<LinkedInCredentials>,
    pub twitter: Option<TwitterCredentials>,
    pub youtube: Option<YouTubeCredentials>,
    pub gsc: Option<GscCredentials>,
    pub github: Option<GitHubCredentials>,
}

impl AppConfig {
    /// Whether enough credentials are present to attempt collection for `platform`.
    #[must_use]
    pub fn is_configured(&self, platform: Platform) -> bool {
        match platform {
            Platform::Reddit => self.reddit.is_some(),
            Platform::LinkedIn => self.linkedin.is_some(),
            Platform::Twitter => self.twitter.is_some(),
            Platform::YouTube => self.youtube.is_some(),
            Platform::Gsc => self.gsc.is_some(),
            Platform::GitHub => self.github.is_some(),
        }
    }
}

fn redacted<T>(value: Option<&T>) -> Option<&'static str> {
    value.map(|_| "[redacted]")
}

impl std::fmt::Debug for LinkedInCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInCredentials")
            .field("access_token", &"[redacted]")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

impl std::fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("bearer_token", &"[redacted]")
            .field("username", &self.username)
            .finish()
    }
}

impl std::fmt::Debug for YouTubeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeCredentials")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

impl std::fmt::Debug for GitHubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubCredentials")
            .field("username", &self.username)
            .field("token", &redacted(self.token.as_ref()))
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("reddit", &self.reddit)
            .field("linkedin", &self.linkedin)
            .field("twitter", &self.twitter)
            .field("youtube", &self.youtube)
            .field("gsc", &self.gsc)
            .field("github", &self.github)
            .finish()
    }
}
