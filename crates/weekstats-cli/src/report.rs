//! `report` and `platforms` command handlers.

use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use weekstats_collectors::collect_all;
use weekstats_core::{export_csv, print_summary, AppConfig, DateRange, Platform};

pub(crate) const INVALID_DATE: &str = "Invalid date format. Use YYYY-MM-DD format.";

/// clap value parser: accept any known platform id or alias, store the
/// canonical id.
pub(crate) fn parse_platform_id(value: &str) -> Result<String, String> {
    value
        .parse::<Platform>()
        .map(|p| p.id().to_string())
        .map_err(|e| e.to_string())
}

/// Resolve `--start-date`; `None` means `days_back` days before `today`.
pub(crate) fn resolve_start_date(
    start_date: Option<&str>,
    today: NaiveDate,
    days_back: u32,
) -> anyhow::Result<NaiveDate> {
    match start_date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!(INVALID_DATE)),
        None => today
            .checked_sub_signed(Duration::days(i64::from(days_back)))
            .ok_or_else(|| anyhow::anyhow!("start date out of range")),
    }
}

/// Collect every requested platform, print the summary and export the CSV.
///
/// # Errors
///
/// Returns an error for an unparsable start date, a window that overflows
/// the calendar, or a CSV that cannot be written. Per-platform collection
/// failures are reported in the summary instead.
pub(crate) async fn run_report(
    config: &AppConfig,
    start_date: Option<&str>,
    days: u32,
    output: Option<&Path>,
    platforms: &[String],
) -> anyhow::Result<()> {
    let start = resolve_start_date(start_date, Utc::now().date_naive(), 7)?;
    let range = DateRange::from_start_date(start, days)?;
    tracing::debug!(start = %range.start, end = %range.end, "report window");

    println!(
        "Collecting stats from {} to {}",
        range.start_date().format("%B %d, %Y"),
        range.end_date().format("%B %d, %Y")
    );
    println!("{}", "=".repeat(60));
    if !platforms.is_empty() {
        println!("Collecting stats for: {}", platforms.join(", "));
    }

    let selection = (!platforms.is_empty()).then_some(platforms);
    let report = collect_all(config, selection, range).await?;

    print_summary(std::io::stdout().lock(), &report)?;

    let path = export_csv(&report, output).context("failed to export CSV")?;
    println!("\nDetailed stats exported to: {}", path.display());
    Ok(())
}

pub(crate) fn run_platforms(config: &AppConfig) {
    for platform in Platform::ALL {
        let state = if config.is_configured(platform) {
            "configured"
        } else {
            "not configured"
        };
        println!("{:<10} {:<24} {state}", platform.id(), platform.display_name());
    }
}
