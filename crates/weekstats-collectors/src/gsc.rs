//! Google Search Console search analytics, grouped by country.
//!
//! The window is sent as calendar dates `start ..= end - 1 day`.
//!
//! Credentials file handling:
//! - `{"access_token": "..."}` is used as a bearer token directly.
//! - An `authorized_user` document has its refresh token exchanged at
//!   `token_uri` with a form POST.
//! - `service_account` keys are rejected.

use std::path::Path;

use chrono::Duration;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::json;
use weekstats_core::{click_through_rate, DateRange, GscCredentials, GscStats, Platform, PlatformStats};

use crate::collector::Collector;
use crate::error::CollectorError;
use crate::http::{build_client, normalize_base, read_json, HttpSettings};

const DEFAULT_BASE_URL: &str = "https://searchconsole.googleapis.com";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ROW_LIMIT: u32 = 1000;
const US_COUNTRY_KEY: &str = "usa";

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    access_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
    token_uri: Option<String>,
}

/// How to obtain a bearer token for the Search Console API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenSource {
    Static(String),
    Refresh {
        token_uri: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Row {
    #[serde(default)]
    pub(crate) keys: Vec<String>,
    #[serde(default)]
    pub(crate) clicks: f64,
    #[serde(default)]
    pub(crate) impressions: f64,
}

pub struct GscCollector {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<GscCredentials>,
}

impl GscCollector {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: Option<GscCredentials>,
        settings: &HttpSettings,
    ) -> Result<Self, CollectorError> {
        Self::with_base_url(credentials, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        credentials: Option<GscCredentials>,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, CollectorError> {
        Ok(Self {
            client: build_client(settings)?,
            base_url: normalize_base(base_url),
            credentials,
        })
    }

    async fn access_token(&self, source: TokenSource) -> Result<String, CollectorError> {
        match source {
            TokenSource::Static(token) => Ok(token),
            TokenSource::Refresh {
                token_uri,
                client_id,
                client_secret,
                refresh_token,
            } => {
                let response = self
                    .client
                    .post(&token_uri)
                    .form(&[
                        ("grant_type", "refresh_token"),
                        ("client_id", client_id.as_str()),
                        ("client_secret", client_secret.as_str()),
                        ("refresh_token", refresh_token.as_str()),
                    ])
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(CollectorError::Auth(format!(
                        "token refresh at {token_uri} returned HTTP {}",
                        response.status().as_u16()
                    )));
                }
                let token: TokenResponse = read_json(response, "google oauth token").await?;
                Ok(token.access_token)
            }
        }
    }

    async fn query(
        &self,
        token: &str,
        property_url: &str,
        range: &DateRange,
    ) -> Result<Vec<Row>, CollectorError> {
        let site = utf8_percent_encode(property_url, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/webmasters/v3/sites/{site}/searchAnalytics/query",
            self.base_url
        );
        let (start, end) = query_dates(range);
        let body = json!({
            "startDate": start,
            "endDate": end,
            "dimensions": ["country"],
            "rowLimit": ROW_LIMIT,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let parsed: QueryResponse = read_json(response, "gsc search analytics").await?;
        Ok(parsed.rows)
    }
}

impl Collector for GscCollector {
    fn platform(&self) -> Platform {
        Platform::Gsc
    }

    async fn collect(&self, range: &DateRange) -> Result<PlatformStats, CollectorError> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or(CollectorError::NotConfigured(Platform::Gsc))?;

        let source = load_token_source(&creds.credentials_file).await?;
        let token = self.access_token(source).await?;
        let rows = self.query(&token, &creds.property_url, range).await?;
        tracing::debug!(property = %creds.property_url, rows = rows.len(), "fetched gsc rows");
        Ok(PlatformStats::Gsc(summarize(&rows)))
    }
}

async fn load_token_source(path: &Path) -> Result<TokenSource, CollectorError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CollectorError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_token_source(&raw)
}

pub(crate) fn parse_token_source(raw: &str) -> Result<TokenSource, CollectorError> {
    let file: CredentialsFile =
        serde_json::from_str(raw).map_err(|source| CollectorError::Deserialize {
            context: "gsc credentials file".to_string(),
            source,
        })?;

    if let Some(token) = file.access_token.filter(|t| !t.is_empty()) {
        return Ok(TokenSource::Static(token));
    }

    match file.kind.as_deref() {
        Some("service_account") => Err(CollectorError::Auth(
            "service account keys are not supported; provide an access_token or an \
             authorized_user credentials file"
                .to_string(),
        )),
        Some("authorized_user") | None => {
            let (Some(client_id), Some(client_secret), Some(refresh_token)) =
                (file.client_id, file.client_secret, file.refresh_token)
            else {
                return Err(CollectorError::Auth(
                    "credentials file needs access_token, or client_id, client_secret \
                     and refresh_token"
                        .to_string(),
                ));
            };
            Ok(TokenSource::Refresh {
                token_uri: file
                    .token_uri
                    .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
                client_id,
                client_secret,
                refresh_token,
            })
        }
        Some(other) => Err(CollectorError::Auth(format!(
            "unsupported credentials type `{other}`"
        ))),
    }
}

/// `start ..= end - 1 day` as `YYYY-MM-DD` strings.
pub(crate) fn query_dates(range: &DateRange) -> (String, String) {
    let start = range.start.date_naive();
    let end = (range.end - Duration::days(1)).date_naive().max(start);
    (
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

pub(crate) fn summarize(rows: &[Row]) -> GscStats {
    let mut stats = GscStats::default();
    for row in rows {
        let clicks = whole(row.clicks);
        if row.keys.first().is_some_and(|k| k == US_COUNTRY_KEY) {
            stats.clicks_us = clicks;
        }
        stats.clicks += clicks;
        stats.impressions += whole(row.impressions);
    }
    stats.ctr = click_through_rate(stats.clicks, stats.impressions);
    stats
}
