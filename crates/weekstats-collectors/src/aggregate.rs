//! Fan out to the selected collectors and assemble a [`Report`].

use futures::future::join_all;
use weekstats_core::{AppConfig, DateRange, LinkedInStats, Platform, PlatformReport, PlatformStats, Report};

use crate::collector::collect_or_default;
use crate::error::CollectorError;
use crate::http::HttpSettings;
use crate::{
    GitHubCollector, GscCollector, LinkedInCollector, RedditCollector, TwitterCollector,
    YouTubeCollector,
};

/// One collector per platform, built once from configuration.
pub struct Collectors {
    pub reddit: RedditCollector,
    pub linkedin: LinkedInCollector,
    pub twitter: TwitterCollector,
    pub youtube: YouTubeCollector,
    pub gsc: GscCollector,
    pub github: GitHubCollector,
}

impl Collectors {
    /// # Errors
    ///
    /// Returns [`CollectorError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, CollectorError> {
        let settings = HttpSettings::from_config(config);
        Ok(Self {
            reddit: RedditCollector::new(config.reddit.clone(), &settings)?,
            linkedin: LinkedInCollector::new(config.linkedin.clone(), &settings)?,
            twitter: TwitterCollector::new(config.twitter.clone(), &settings)?,
            youtube: YouTubeCollector::new(config.youtube.clone(), &settings)?,
            gsc: GscCollector::new(config.gsc.clone(), &settings)?,
            github: GitHubCollector::new(config.github.clone(), &settings)?,
        })
    }

    async fn collect_one(
        &self,
        platform: Platform,
        range: &DateRange,
        manual_linkedin: Option<&LinkedInStats>,
    ) -> (Platform, PlatformReport) {
        let entry = match platform {
            Platform::Reddit => collect_or_default(&self.reddit, range).await,
            Platform::LinkedIn => match manual_linkedin {
                Some(manual) => {
                    tracing::info!(platform = %platform, "using manually entered stats");
                    PlatformReport::manual(PlatformStats::LinkedIn(manual.clone()))
                }
                None => collect_or_default(&self.linkedin, range).await,
            },
            Platform::Twitter => collect_or_default(&self.twitter, range).await,
            Platform::YouTube => collect_or_default(&self.youtube, range).await,
            Platform::Gsc => collect_or_default(&self.gsc, range).await,
            Platform::GitHub => collect_or_default(&self.github, range).await,
        };
        (platform, entry)
    }

    /// Collect every platform in `platforms` concurrently.
    ///
    /// Each selected platform gets exactly one entry, whatever happened to
    /// it. A `manual_linkedin` record replaces the `LinkedIn` API call.
    pub async fn collect_report(
        &self,
        platforms: &[Platform],
        range: DateRange,
        manual_linkedin: Option<&LinkedInStats>,
    ) -> Report {
        let started = std::time::Instant::now();
        let results = join_all(
            platforms
                .iter()
                .map(|&p| self.collect_one(p, &range, manual_linkedin)),
        )
        .await;

        let mut report = Report::new(range);
        for (platform, entry) in results {
            report.insert(platform, entry);
        }
        tracing::info!(
            platforms = report.platforms.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "report assembled"
        );
        report
    }
}

/// Resolve platform ids and collect them into one report.
///
/// `None` selects every platform. Unknown ids are logged and skipped.
///
/// # Errors
///
/// Returns [`CollectorError::Http`] if an HTTP client cannot be built.
/// Collection failures never surface here; they become report entries.
pub async fn collect_all(
    config: &AppConfig,
    platforms: Option<&[String]>,
    range: DateRange,
) -> Result<Report, CollectorError> {
    let selected = resolve_platforms(platforms);
    let collectors = Collectors::from_config(config)?;
    Ok(collectors.collect_report(&selected, range, None).await)
}

/// Map requested ids onto platforms, in canonical order.
#[must_use]
pub fn resolve_platforms(requested: Option<&[String]>) -> Vec<Platform> {
    let Some(ids) = requested else {
        return Platform::ALL.to_vec();
    };
    for id in ids {
        if id.parse::<Platform>().is_err() {
            tracing::debug!(platform = %id, "ignoring unknown platform");
        }
    }
    Platform::select(ids)
}
