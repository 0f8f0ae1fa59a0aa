//! Query-string parsing shared by the dashboard and the JSON report route.
//!
//! `platform` may repeat, which `serde_urlencoded` cannot collect into a
//! `Vec`, so the raw query is split by hand.

use percent_encoding::percent_decode_str;

pub(super) const DEFAULT_DAYS: u32 = 7;
/// Upper bound on the window; keeps `DateRange::last_days` far from overflow.
pub(super) const MAX_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ReportQuery {
    /// `None` when no `platform` parameter was given.
    pub platforms: Option<Vec<String>>,
    pub days: u32,
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parse `platform=..&platform=..&days=N`. Unknown keys are ignored.
///
/// Returns a message suitable for a 400 response when `days` is invalid.
pub(super) fn parse_report_query(raw: Option<&str>) -> Result<ReportQuery, String> {
    let mut platforms = Vec::new();
    let mut days = None;

    for pair in raw.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match decode(key).as_str() {
            "platform" => {
                let value = decode(value);
                if !value.trim().is_empty() {
                    platforms.push(value);
                }
            }
            "days" => days = Some(decode(value)),
            _ => {}
        }
    }

    let days = match days {
        None => DEFAULT_DAYS,
        Some(value) => match value.trim().parse::<u32>() {
            Ok(n) if (1..=MAX_DAYS).contains(&n) => n,
            _ => {
                return Err(format!(
                    "days must be an integer between 1 and {MAX_DAYS}, got `{value}`"
                ))
            }
        },
    };

    Ok(ReportQuery {
        platforms: (!platforms.is_empty()).then_some(platforms),
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_defaults_to_all_platforms_and_a_week() {
        let q = parse_report_query(None).unwrap();
        assert_eq!(q.platforms, None);
        assert_eq!(q.days, 7);
    }

    #[test]
    fn repeated_platform_params_are_collected() {
        let q = parse_report_query(Some("platform=reddit&platform=gsc&days=14")).unwrap();
        assert_eq!(
            q.platforms,
            Some(vec!["reddit".to_string(), "gsc".to_string()])
        );
        assert_eq!(q.days, 14);
    }

    #[test]
    fn values_are_percent_decoded() {
        let q = parse_report_query(Some("platform=google+search%20console")).unwrap();
        assert_eq!(q.platforms, Some(vec!["google search console".to_string()]));
    }

    #[test]
    fn invalid_days_are_rejected() {
        assert!(parse_report_query(Some("days=abc")).is_err());
        assert!(parse_report_query(Some("days=0")).is_err());
        assert!(parse_report_query(Some("days=-3")).is_err());
        assert!(parse_report_query(Some("days=100000")).is_err());
    }
}
