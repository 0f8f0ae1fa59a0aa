//! Shared HTTP plumbing for collectors.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use weekstats_core::AppConfig;

use crate::error::CollectorError;

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Browser-like UA for the endpoints that throttle obvious bots
/// (Reddit's public JSON and `YouTube` channel pages).
pub(crate) const BROWSER_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Transport settings applied to every collector's client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "weekstats/0.1 (engagement-report)".to_string(),
        }
    }
}

pub(crate) fn build_client(settings: &HttpSettings) -> Result<Client, CollectorError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(&settings.user_agent)
        .build()?;
    Ok(client)
}

/// Strip trailing slashes so paths can be appended with `format!`.
pub(crate) fn normalize_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Fail on a non-2xx status, otherwise hand the response back.
///
/// The error keeps the URL without its query string.
pub(crate) fn ensure_success(response: Response) -> Result<Response, CollectorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut url = response.url().clone();
    url.set_query(None);
    Err(CollectorError::UnexpectedStatus {
        status: status.as_u16(),
        url: url.to_string(),
    })
}

/// Percent-encode one URL path segment, leaving RFC 3986 unreserved bytes.
pub(crate) fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Check the status and decode the body as `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, CollectorError> {
    let response = ensure_success(response)?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| CollectorError::Deserialize {
        context: context.to_string(),
        source,
    })
}

/// Like [`read_json`], but a non-2xx status is logged and yields `None`.
///
/// Used where one failed sub-request should contribute zeros instead of
/// failing the whole collection.
pub(crate) async fn read_json_or_skip<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<Option<T>, CollectorError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            context,
            status = status.as_u16(),
            "sub-request failed; counting as zero"
        );
        return Ok(None);
    }
    read_json(response, context).await.map(Some)
}
