use std::future::Future;

use weekstats_core::{DateRange, Platform, PlatformReport, PlatformStats};

use crate::error::CollectorError;

/// One platform's adapter: credentials in, statistics record out.
pub trait Collector {
    fn platform(&self) -> Platform;

    /// Fetch and reduce the platform's data for `range`.
    ///
    /// Returns [`CollectorError::NotConfigured`] without touching the network
    /// when credentials are absent.
    fn collect(
        &self,
        range: &DateRange,
    ) -> impl Future<Output = Result<PlatformStats, CollectorError>> + Send;
}

/// Run `collector` and fold any error into the platform's empty record.
///
/// This never fails: missing configuration becomes a `not_configured` entry,
/// every other error a `failed` entry carrying the message.
pub async fn collect_or_default<C>(collector: &C, range: &DateRange) -> PlatformReport
where
    C: Collector + Sync,
{
    let platform = collector.platform();
    tracing::info!(platform = %platform, "collecting stats");

    match collector.collect(range).await {
        Ok(stats) => {
            tracing::debug!(
                platform = %platform,
                posts = stats.posts_count(),
                "collection finished"
            );
            PlatformReport::ok(stats)
        }
        Err(CollectorError::NotConfigured(_)) => {
            tracing::debug!(platform = %platform, "credentials not configured; skipping");
            PlatformReport::not_configured(platform)
        }
        Err(e) if e.is_upstream() => {
            tracing::warn!(platform = %platform, error = %e, "upstream request failed");
            PlatformReport::failed(platform, e.to_string())
        }
        Err(e) => {
            tracing::error!(platform = %platform, error = %e, "collection failed");
            PlatformReport::failed(platform, e.to_string())
        }
    }
}
