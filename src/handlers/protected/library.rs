// handlers/protected/library.rs - GET /api/prompts and GET /api/favorites handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::aggregate::{AggregationRequest, SavedItem};
use crate::error::{ApiError, ApiResult};
use crate::handlers::ListQuery;
use crate::session::SessionContext;
use crate::state::AppState;
use crate::store::{Collection, StoreError};

/// GET /api/prompts - the caller's saved prompts, newest first
pub async fn prompts_get(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params.map_err(|rejection| ApiError::invalid_input("prompts", rejection, "Invalid query parameters"))?;
    list_owned(&state, &session, Collection::Prompts, params.limit, "prompts", "Failed to load prompts").await
}

/// GET /api/favorites - the caller's favorites, newest first
pub async fn favorites_get(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) =
        params.map_err(|rejection| ApiError::invalid_input("favorites", rejection, "Invalid query parameters"))?;
    list_owned(&state, &session, Collection::Favorites, params.limit, "favorites", "Failed to load favorites").await
}

async fn list_owned(
    state: &AppState,
    session: &SessionContext,
    collection: Collection,
    limit: Option<u32>,
    field: &str,
    public_message: &str,
) -> ApiResult<Json<Value>> {
    let (Some(subject), Some(claims)) = (session.subject, session.claims.as_ref()) else {
        return Err(ApiError::Unauthenticated);
    };
    let operation = collection.name();

    let store = state
        .provider
        .for_user(claims)
        .map_err(|e| ApiError::upstream(operation, public_message, e))?;

    let result = AggregationRequest::list(collection)
        .owned_by(subject)
        .limit(state.config.list_limit(limit))
        .with_count()
        .execute(store.as_ref())
        .await
        .map_err(|e| ApiError::upstream(operation, public_message, e))?;

    let count = result
        .exact_count()
        .map_err(|e| ApiError::upstream(operation, public_message, e))?;
    let items = result
        .into_rows()
        .into_iter()
        .map(|row| SavedItem::from_row(row, collection.name()))
        .collect::<Result<Vec<_>, StoreError>>()
        .map_err(|e| ApiError::upstream(operation, public_message, e))?;

    Ok(Json(json!({ field: items, "count": count })))
}
