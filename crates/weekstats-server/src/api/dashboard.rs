//! `GET /`: server-rendered HTML dashboard.

use std::fmt::Write as _;

use axum::{
    extract::{RawQuery, State},
    response::Html,
    Extension,
};
use serde_json::Value;
use weekstats_core::{AppConfig, Platform, PlatformReport, Report, ReportStatus};

use crate::middleware::RequestId;

use super::query::{parse_report_query, ReportQuery};
use super::{build_report, ApiError, AppState};

pub(super) async fn index(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> Result<Html<String>, ApiError> {
    let query = parse_report_query(raw.as_deref())
        .map_err(|message| ApiError::new(req_id.0.clone(), "bad_request", message))?;
    let report = build_report(&state, &req_id.0, &query).await?;
    Ok(Html(render(&report, &query, &state.config)))
}

/// Escape text for use in element content and quoted attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn metric_value(value: &Value) -> String {
    match value {
        Value::Null => "n/a".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) if items.is_empty() => "none".to_string(),
        Value::Object(map) if map.is_empty() => "none".to_string(),
        other => other.to_string(),
    }
}

fn status_label(entry: &PlatformReport) -> String {
    match entry.status {
        ReportStatus::Ok => "live".to_string(),
        ReportStatus::Manual => "entered manually".to_string(),
        ReportStatus::NotConfigured => "not configured".to_string(),
        ReportStatus::Failed => format!(
            "collection failed: {}",
            entry.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn render_platform(out: &mut String, platform: Platform, entry: &PlatformReport) {
    let _ = writeln!(
        out,
        r#"<section class="platform {}"><h2>{}</h2><p class="status">{}</p>"#,
        platform.id(),
        escape(platform.display_name()),
        escape(&status_label(entry)),
    );

    out.push_str("<table>\n");
    if let Ok(Value::Object(fields)) = serde_json::to_value(&entry.stats) {
        for (name, value) in &fields {
            let _ = writeln!(
                out,
                "<tr><th>{}</th><td>{}</td></tr>",
                escape(&name.replace('_', " ")),
                escape(&metric_value(value)),
            );
        }
    }
    out.push_str("</table></section>\n");
}

fn render_filters(out: &mut String, query: &ReportQuery, config: &AppConfig) {
    out.push_str(r#"<form method="get" action="/" class="filters">"#);
    for platform in Platform::ALL {
        let checked = query
            .platforms
            .as_ref()
            .is_none_or(|ids| Platform::select(ids.as_slice()).contains(&platform));
        let hint = if config.is_configured(platform) {
            ""
        } else {
            " (not configured)"
        };
        let _ = write!(
            out,
            r#"<label><input type="checkbox" name="platform" value="{}"{}> {}{}</label>"#,
            platform.id(),
            if checked { " checked" } else { "" },
            escape(platform.display_name()),
            hint,
        );
    }
    let _ = writeln!(
        out,
        r#"<label>Days <input type="number" name="days" min="1" value="{}"></label><button type="submit">Refresh</button></form>"#,
        query.days
    );
}

const LINKEDIN_FORM: &str = r#"<section class="manual">
<h2>Enter LinkedIn stats</h2>
<form id="linkedin-form">
<label>Posts <input type="number" min="0" name="posts_count"></label>
<label>Likes <input type="number" min="0" name="likes"></label>
<label>Comments <input type="number" min="0" name="comments"></label>
<label>Shares <input type="number" min="0" name="shares"></label>
<label>Impressions <input type="number" min="0" name="impressions"></label>
<button type="submit">Save</button>
</form>
<p id="linkedin-result"></p>
</section>
<script>
document.getElementById("linkedin-form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const body = {};
  for (const [key, value] of new FormData(event.target)) {
    if (value !== "") body[key] = Number(value);
  }
  const res = await fetch("/api/linkedin", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  const json = await res.json();
  document.getElementById("linkedin-result").textContent = json.message;
  if (json.success) window.location.reload();
});
</script>
"#;

pub(super) fn render(report: &Report, query: &ReportQuery, config: &AppConfig) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Weekly Stats</title>\n\
         <style>body{font-family:sans-serif;max-width:960px;margin:2rem auto}\
         section{border:1px solid #ddd;border-radius:6px;padding:1rem;margin:1rem 0}\
         th{text-align:left;padding-right:2rem;font-weight:normal;color:#555}\
         .status{font-style:italic}</style>\n</head>\n<body>\n",
    );
    let _ = writeln!(
        out,
        "<h1>Weekly Stats</h1>\n<p class=\"range\">{} to {}</p>",
        escape(&report.start_date),
        escape(&report.end_date),
    );

    render_filters(&mut out, query, config);

    if report.platforms.is_empty() {
        out.push_str("<p>No platforms selected.</p>\n");
    }
    for (platform, entry) in &report.platforms {
        render_platform(&mut out, *platform, entry);
    }

    out.push_str(LINKEDIN_FORM);
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;
    use weekstats_core::{DateRange, PlatformStats, RedditStats, RedditTopPost};

    use super::*;
    use crate::api::test_support::{offline_config, test_app};

    async fn get_html(app: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, String::from_utf8(body.to_vec()).expect("utf8"))
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn rendered_titles_are_escaped() {
        let mut report = Report::new(DateRange::last_days(7).expect("range"));
        report.insert(
            Platform::Reddit,
            PlatformReport::ok(PlatformStats::Reddit(RedditStats {
                posts_count: 1,
                top_post: Some(RedditTopPost {
                    title: "<script>alert(1)</script>".to_string(),
                    ..RedditTopPost::default()
                }),
                ..RedditStats::default()
            })),
        );
        let query = ReportQuery {
            platforms: None,
            days: 7,
        };
        let html = render(&report, &query, &offline_config());
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[tokio::test]
    async fn dashboard_renders_every_platform_by_default() {
        let (app, _) = test_app();
        let (status, html) = get_html(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        for platform in Platform::ALL {
            assert!(html.contains(&format!("<h2>{}</h2>", escape(platform.display_name()))));
        }
        assert!(html.contains("not configured"));
    }

    #[tokio::test]
    async fn dashboard_honours_platform_selection() {
        let (app, _) = test_app();
        let (status, html) = get_html(app, "/?platform=gsc&days=14").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<h2>Google Search Console</h2>"));
        assert!(!html.contains("<h2>Reddit</h2>"));
        assert!(html.contains(r#"name="days" min="1" value="14""#));
    }

    #[tokio::test]
    async fn invalid_days_is_bad_request() {
        let (app, _) = test_app();
        let (status, _) = get_html(app, "/?days=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn posted_linkedin_stats_show_until_overwritten() {
        let (app, _) = test_app();

        let post = |body: &'static str| {
            Request::builder()
                .method("POST")
                .uri("/api/linkedin")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request")
        };

        let response = app
            .clone()
            .oneshot(post(r#"{"posts_count": 7, "likes": 4321, "impressions": 98765}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let (_, html) = get_html(app.clone(), "/?platform=linkedin").await;
        assert!(html.contains("entered manually"));
        assert!(html.contains("<td>4321</td>"));
        assert!(html.contains("<td>98765</td>"));

        let response = app
            .clone()
            .oneshot(post(r#"{"likes": 5}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let (_, html) = get_html(app, "/?platform=linkedin").await;
        assert!(!html.contains("<td>4321</td>"));
        assert!(html.contains("<td>5</td>"));
    }
}
