use std::collections::BTreeMap;

use serde::Serialize;

use crate::{DateRange, Platform, PlatformStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Collected from the platform's API.
    Ok,
    /// Selected, but credentials are missing. Stats are the empty record.
    NotConfigured,
    /// Collection failed. Stats are the empty record.
    Failed,
    /// Entered by hand through the dashboard.
    Manual,
}

/// One platform's contribution to a [`Report`].
///
/// `stats` is always a complete record, whatever the status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformReport {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub stats: PlatformStats,
}

impl PlatformReport {
    #[must_use]
    pub fn ok(stats: PlatformStats) -> Self {
        Self {
            status: ReportStatus::Ok,
            error: None,
            stats,
        }
    }

    #[must_use]
    pub fn manual(stats: PlatformStats) -> Self {
        Self {
            status: ReportStatus::Manual,
            error: None,
            stats,
        }
    }

    #[must_use]
    pub fn not_configured(platform: Platform) -> Self {
        Self {
            status: ReportStatus::NotConfigured,
            error: None,
            stats: PlatformStats::empty(platform),
        }
    }

    #[must_use]
    pub fn failed(platform: Platform, error: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Failed,
            error: Some(error.into()),
            stats: PlatformStats::empty(platform),
        }
    }
}

/// Aggregated statistics for one window, keyed by platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub platforms: BTreeMap<Platform, PlatformReport>,
    #[serde(skip)]
    pub range: DateRange,
}

impl Report {
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            start_date: range.start_date().format("%Y-%m-%d").to_string(),
            end_date: range.end_date().format("%Y-%m-%d").to_string(),
            platforms: BTreeMap::new(),
            range,
        }
    }

    pub fn insert(&mut self, platform: Platform, entry: PlatformReport) {
        self.platforms.insert(platform, entry);
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&PlatformReport> {
        self.platforms.get(&platform)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn range() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 9, 22, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 9, 29, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn report_serializes_bounds_and_platform_keys() {
        let mut report = Report::new(range());
        report.insert(Platform::Reddit, PlatformReport::not_configured(Platform::Reddit));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["start_date"], "2024-09-22");
        assert_eq!(json["end_date"], "2024-09-29");
        assert_eq!(json["platforms"]["reddit"]["status"], "not_configured");
        assert_eq!(json["platforms"]["reddit"]["stats"]["posts_count"], 0);
        assert!(json["platforms"]["reddit"].get("error").is_none());
        assert!(json.get("range").is_none());
    }

    #[test]
    fn failed_entry_carries_error_and_empty_stats() {
        let entry = PlatformReport::failed(Platform::Gsc, "boom");
        assert_eq!(entry.status, ReportStatus::Failed);
        assert_eq!(entry.error.as_deref(), Some("boom"));
        assert_eq!(entry.stats, PlatformStats::empty(Platform::Gsc));
    }
}
