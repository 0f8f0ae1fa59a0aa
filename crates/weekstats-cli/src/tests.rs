use chrono::NaiveDate;

use super::*;
use crate::report::{parse_platform_id, resolve_start_date, INVALID_DATE};

#[test]
fn parses_report_with_defaults() {
    let cli = Cli::try_parse_from(["weekstats", "report"]).expect("expected valid cli args");

    match cli.command {
        Commands::Report {
            start_date,
            days,
            output,
            platforms,
        } => {
            assert!(start_date.is_none());
            assert_eq!(days, 7);
            assert!(output.is_none());
            assert!(platforms.is_empty());
        }
        Commands::Platforms => panic!("expected report command"),
    }
}

#[test]
fn parses_report_with_all_flags() {
    let cli = Cli::try_parse_from([
        "weekstats",
        "report",
        "--start-date",
        "2024-09-22",
        "--days",
        "14",
        "--output",
        "out.csv",
        "--platforms",
        "reddit",
        "X",
        "gsc",
    ])
    .expect("expected valid cli args");

    let Commands::Report {
        start_date,
        days,
        output,
        platforms,
    } = cli.command
    else {
        panic!("expected report command");
    };
    assert_eq!(start_date.as_deref(), Some("2024-09-22"));
    assert_eq!(days, 14);
    assert_eq!(output, Some(PathBuf::from("out.csv")));
    assert_eq!(platforms, vec!["reddit", "twitter", "gsc"]);
}

#[test]
fn rejects_unknown_platform() {
    let result = Cli::try_parse_from(["weekstats", "report", "--platforms", "myspace"]);
    assert!(result.is_err());
}

#[test]
fn rejects_non_numeric_days() {
    let result = Cli::try_parse_from(["weekstats", "report", "--days", "week"]);
    assert!(result.is_err());
}

#[test]
fn parses_platforms_command() {
    let cli = Cli::try_parse_from(["weekstats", "platforms"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Platforms));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["weekstats"]).is_err());
}

#[test]
fn platform_ids_are_canonicalized() {
    assert_eq!(parse_platform_id("Twitter").unwrap(), "twitter");
    assert_eq!(parse_platform_id("x").unwrap(), "twitter");
    assert!(parse_platform_id("friendster").is_err());
}

#[test]
fn start_date_defaults_to_a_week_ago() {
    let today = NaiveDate::from_ymd_opt(2024, 9, 29).unwrap();
    assert_eq!(
        resolve_start_date(None, today, 7).unwrap(),
        NaiveDate::from_ymd_opt(2024, 9, 22).unwrap()
    );
}

#[test]
fn bad_start_date_has_the_usage_message() {
    let today = NaiveDate::from_ymd_opt(2024, 9, 29).unwrap();
    for raw in ["09/22/2024", "2024-13-01", "yesterday"] {
        let err = resolve_start_date(Some(raw), today, 7).unwrap_err();
        assert_eq!(err.to_string(), INVALID_DATE);
    }
}
