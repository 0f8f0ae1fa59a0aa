use thiserror::Error;
use weekstats_core::Platform;

#[derive(Debug, Error)]
pub enum CollectorError {
    /// Credentials for the platform are absent. No request was made.
    #[error("{0} is not configured")]
    NotConfigured(Platform),

    /// Network or TLS failure from the underlying HTTP client. The URL is
    /// dropped on conversion since some endpoints carry keys in the query.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

impl CollectorError {
    /// Upstream trouble (transport or status) as opposed to bad data or setup.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http(_) | Self::UnexpectedStatus { .. })
    }
}
