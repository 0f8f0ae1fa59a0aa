use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use weekstats_core::{engagement_rate, LinkedInStats};

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct SubmitResponse {
    success: bool,
    message: String,
}

/// Body of a manual submission. Counters default to zero.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct ManualLinkedIn {
    posts_count: u64,
    likes: u64,
    comments: u64,
    shares: u64,
    impressions: u64,
    engagement_rate: Option<f64>,
}

impl ManualLinkedIn {
    /// An omitted rate is derived from the posted interactions.
    fn into_stats(self) -> LinkedInStats {
        let rate = self.engagement_rate.unwrap_or_else(|| {
            engagement_rate(self.likes + self.comments + self.shares, self.impressions)
        });
        LinkedInStats {
            posts_count: self.posts_count,
            likes: self.likes,
            comments: self.comments,
            shares: self.shares,
            impressions: self.impressions,
            engagement_rate: rate,
        }
    }
}

/// `POST /api/linkedin`: store manually entered `LinkedIn` numbers.
///
/// Any subset of the record's fields may be sent.
pub(super) async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<ManualLinkedIn>, JsonRejection>,
) -> (StatusCode, Json<SubmitResponse>) {
    match payload {
        Ok(Json(body)) => {
            let stats = body.into_stats();
            tracing::info!(
                posts = stats.posts_count,
                impressions = stats.impressions,
                "manual linkedin stats saved"
            );
            state.manual.set_linkedin(stats).await;
            (
                StatusCode::OK,
                Json(SubmitResponse {
                    success: true,
                    message: "LinkedIn stats saved".to_string(),
                }),
            )
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected manual linkedin stats");
            (
                rejection.status(),
                Json(SubmitResponse {
                    success: false,
                    message: rejection.body_text(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::test_support::test_app;

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/linkedin")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[tokio::test]
    async fn partial_body_is_stored_with_zero_defaults() {
        let (app, store) = test_app();
        let response = app
            .oneshot(post(r#"{"posts_count": 4, "likes": 52}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);

        let saved = store.linkedin().await.expect("stored");
        assert_eq!(saved.posts_count, 4);
        assert_eq!(saved.likes, 52);
        assert_eq!(saved.impressions, 0);
        assert!(saved.engagement_rate.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn omitted_engagement_rate_is_derived() {
        let (app, store) = test_app();
        let response = app
            .oneshot(post(
                r#"{"likes": 30, "comments": 5, "shares": 5, "impressions": 800}"#,
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let saved = store.linkedin().await.expect("stored");
        assert!((saved.engagement_rate - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn posted_engagement_rate_is_kept() {
        let (app, store) = test_app();
        app.oneshot(post(r#"{"likes": 30, "impressions": 800, "engagement_rate": 7.5}"#))
            .await
            .expect("response");

        let saved = store.linkedin().await.expect("stored");
        assert!((saved.engagement_rate - 7.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let (app, store) = test_app();
        let response = app.oneshot(post("{not json")).await.expect("response");

        assert!(response.status().is_client_error());
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
        assert!(store.linkedin().await.is_none());
    }

    #[tokio::test]
    async fn wrong_field_type_is_unprocessable() {
        let (app, _) = test_app();
        let response = app
            .oneshot(post(r#"{"likes": "many"}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
