mod dashboard;
mod linkedin;
mod query;
mod stats;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use weekstats_collectors::{resolve_platforms, Collectors};
use weekstats_core::{AppConfig, DateRange, Report};

use crate::middleware::{request_id, REQUEST_ID_HEADER};
use crate::store::ManualStatsStore;

use self::query::ReportQuery;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub collectors: Arc<Collectors>,
    pub manual: ManualStatsStore,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Collect the report a dashboard request asks for.
///
/// Manually entered `LinkedIn` numbers, when present, replace the API call.
pub(super) async fn build_report(
    state: &AppState,
    request_id: &str,
    query: &ReportQuery,
) -> Result<Report, ApiError> {
    let range = DateRange::last_days(query.days)
        .map_err(|e| ApiError::new(request_id, "bad_request", e.to_string()))?;
    let platforms = resolve_platforms(query.platforms.as_deref());
    let manual = state.manual.linkedin().await;

    Ok(state
        .collectors
        .collect_report(&platforms, range, manual.as_ref())
        .await)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/api/health", get(health))
        .route("/api/stats", get(stats::report))
        .route("/api/linkedin", post(linkedin::submit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::Router;
    use weekstats_collectors::Collectors;
    use weekstats_core::AppConfig;

    use super::{build_app, AppState};
    use crate::store::ManualStatsStore;

    /// Configuration with no platform credentials: collection never leaves
    /// the process.
    pub(crate) fn offline_config() -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
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

    pub(crate) fn test_app() -> (Router, ManualStatsStore) {
        let config = offline_config();
        let collectors = Collectors::from_config(&config).expect("collectors");
        let manual = ManualStatsStore::new();
        let app = build_app(AppState {
            config: Arc::new(config),
            collectors: Arc::new(collectors),
            manual: manual.clone(),
        });
        (app, manual)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::test_support::test_app;
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn request_id_is_echoed_or_generated() {
        let (app, _) = test_app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let generated = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .expect("ascii header");
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "bad_request", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
