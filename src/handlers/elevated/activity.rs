// handlers/elevated/activity.rs - GET /api/admin/activity/recent handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::aggregate::{ActivityRecord, AggregationRequest};
use crate::error::{ApiError, ApiResult};
use crate::handlers::ListQuery;
use crate::state::AppState;
use crate::store::{Collection, StoreError};

const FAILED: &str = "Failed to load activity";

/// GET /api/admin/activity/recent?limit=N - newest activity first, each row
/// carrying `actorName` ("Unknown" when the actor has no display name).
pub async fn activity_recent(
    State(state): State<AppState>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params
        .map_err(|rejection| ApiError::invalid_input("activity_recent", rejection, "Invalid query parameters"))?;
    let store = state
        .provider
        .service()
        .map_err(|e| ApiError::upstream("activity_recent", FAILED, e))?;

    let rows = AggregationRequest::list(Collection::Activity)
        .limit(state.config.list_limit(params.limit))
        .execute(store.as_ref())
        .await
        .map_err(|e| ApiError::upstream("activity_recent", FAILED, e))?
        .into_rows();

    let activity = rows
        .into_iter()
        .map(ActivityRecord::from_row)
        .collect::<Result<Vec<_>, StoreError>>()
        .map_err(|e| ApiError::upstream("activity_recent", FAILED, e))?;

    Ok(Json(json!({ "activity": activity })))
}
