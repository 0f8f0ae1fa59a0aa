//! Report assembly across collectors.

use chrono::NaiveDate;
use weekstats_collectors::{
    collect_all, Collectors, GitHubCollector, GscCollector, HttpSettings, LinkedInCollector,
    RedditCollector, TwitterCollector, YouTubeCollector,
};
use weekstats_core::{
    AppConfig, DateRange, GitHubCredentials, LinkedInStats, Platform, PlatformStats,
    RedditCredentials, ReportStatus,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn week() -> DateRange {
    DateRange::from_start_date(NaiveDate::from_ymd_opt(2024, 9, 22).unwrap(), 7)
        .expect("valid range")
}

fn empty_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "info".to_string(),
        request_timeout_secs: 5,
        user_agent: "weekstats-test".to_string(),
        reddit: None,
        linkedin: None,
        twitter: None,
        youtube: None,
        gsc: None,
        github: None,
    }
}

/// Every collector pointed at `uri`; only Reddit and GitHub have credentials.
fn collectors(uri: &str) -> Collectors {
    let s = HttpSettings {
        timeout_secs: 5,
        user_agent: "weekstats-test".to_string(),
    };
    Collectors {
        reddit: RedditCollector::with_base_url(
            Some(RedditCredentials {
                username: "someone".to_string(),
            }),
            &s,
            uri,
        )
        .unwrap(),
        linkedin: LinkedInCollector::with_base_url(None, &s, uri).unwrap(),
        twitter: TwitterCollector::with_base_url(None, &s, uri).unwrap(),
        youtube: YouTubeCollector::with_base_urls(None, &s, uri, uri).unwrap(),
        gsc: GscCollector::with_base_url(None, &s, uri).unwrap(),
        github: GitHubCollector::with_base_url(
            Some(GitHubCredentials {
                username: "octo".to_string(),
                token: None,
            }),
            &s,
            uri,
        )
        .unwrap(),
    }
}

async fn mount_reddit(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/user/someone/submitted.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "children": [
                { "data": { "title": "t", "score": 7, "num_comments": 1,
                            "subreddit": "rust", "permalink": "/r/rust/t",
                            "created_utc": 1_727_179_200 } }
            ] }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn subset_returns_only_selected_platform() {
    let ids = vec!["reddit".to_string()];
    let report = collect_all(&empty_config(), Some(ids.as_slice()), week())
        .await
        .expect("report");

    assert_eq!(report.platforms.len(), 1);
    assert!(report.get(Platform::Reddit).is_some());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["start_date"], "2024-09-22");
    assert_eq!(json["end_date"], "2024-09-29");
    assert_eq!(json["platforms"].as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn unconfigured_platforms_are_marked_with_empty_records() {
    let report = collect_all(&empty_config(), None, week())
        .await
        .expect("report");

    assert_eq!(report.platforms.len(), Platform::ALL.len());
    for platform in Platform::ALL {
        let entry = report.get(platform).expect("entry per platform");
        assert_eq!(entry.status, ReportStatus::NotConfigured);
        assert_eq!(entry.stats, PlatformStats::empty(platform));
    }
}

#[tokio::test]
async fn unknown_ids_are_ignored() {
    let ids = vec!["myspace".to_string(), "X".to_string()];
    let report = collect_all(&empty_config(), Some(ids.as_slice()), week())
        .await
        .expect("report");
    let keys: Vec<Platform> = report.platforms.keys().copied().collect();
    assert_eq!(keys, vec![Platform::Twitter]);
}

#[tokio::test]
async fn one_failure_does_not_sink_the_others() {
    let server = MockServer::start().await;
    mount_reddit(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/octo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "public_repos": 2, "followers": 0, "following": 0
        })))
        .mount(&server)
        .await;
    // Repos and events fall through to wiremock's default 404.

    let collectors = collectors(&server.uri());
    let report = collectors
        .collect_report(&[Platform::Reddit, Platform::GitHub, Platform::Gsc], week(), None)
        .await;

    let reddit = report.get(Platform::Reddit).unwrap();
    assert_eq!(reddit.status, ReportStatus::Ok);
    assert_eq!(reddit.stats.posts_count(), 1);

    let github = report.get(Platform::GitHub).unwrap();
    assert_eq!(github.status, ReportStatus::Ok);

    let gsc = report.get(Platform::Gsc).unwrap();
    assert_eq!(gsc.status, ReportStatus::NotConfigured);
}

#[tokio::test]
async fn upstream_error_yields_failed_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/someone/submitted.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let collectors = collectors(&server.uri());
    let report = collectors
        .collect_report(&[Platform::Reddit], week(), None)
        .await;

    let entry = report.get(Platform::Reddit).unwrap();
    assert_eq!(entry.status, ReportStatus::Failed);
    assert!(entry.error.as_deref().unwrap().contains("500"));
    assert_eq!(entry.stats, PlatformStats::empty(Platform::Reddit));
}

#[tokio::test]
async fn manual_linkedin_replaces_the_api_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/ugcPosts"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let manual = LinkedInStats {
        posts_count: 3,
        likes: 40,
        impressions: 1_000,
        ..LinkedInStats::default()
    };
    let collectors = collectors(&server.uri());
    let report = collectors
        .collect_report(&[Platform::LinkedIn], week(), Some(&manual))
        .await;

    let entry = report.get(Platform::LinkedIn).unwrap();
    assert_eq!(entry.status, ReportStatus::Manual);
    assert_eq!(entry.stats, PlatformStats::LinkedIn(manual));
}
