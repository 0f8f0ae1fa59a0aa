use axum::{
    extract::{RawQuery, State},
    Extension, Json,
};
use weekstats_core::Report;

use crate::middleware::RequestId;

use super::query::parse_report_query;
use super::{build_report, ApiError, ApiResponse, AppState, ResponseMeta};

/// `GET /api/stats`: the same report the dashboard renders, as JSON.
pub(super) async fn report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<Report>>, ApiError> {
    let query = parse_report_query(raw.as_deref())
        .map_err(|message| ApiError::new(req_id.0.clone(), "bad_request", message))?;
    let data = build_report(&state, &req_id.0, &query).await?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
