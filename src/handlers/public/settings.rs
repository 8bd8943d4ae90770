// handlers/public/settings.rs - GET /settings/:key handler

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::settings::{self, FailurePolicy};
use crate::state::AppState;

/// GET /settings/:key - feature flag read, fails open.
///
/// Missing rows, null values, an unconfigured store and query failures all
/// resolve to the key's documented default. This endpoint never answers 500.
pub async fn settings_get(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<Json<Value>> {
    if !settings::is_valid_key(&key) {
        return Err(ApiError::invalid_input("settings_get", format_args!("key {:?}", key), "Invalid setting key"));
    }

    let default = settings::documented_default(&key);

    let store = match state.provider.service() {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(operation = "settings_get", key = %key, error = %e, "no store client, serving default");
            return Ok(Json(json!({ "value": default })));
        }
    };

    let policy = FailurePolicy::Default(default.clone());
    let resolved = settings::resolve(store.as_ref(), "settings_get", &key, default, &policy)
        .await
        .map_err(|e| ApiError::upstream("settings_get", "Failed to load setting", e))?;

    tracing::debug!(key = %key, source = ?resolved.source, "setting resolved");
    Ok(Json(json!({ "value": resolved.value })))
}

#[cfg(test)]
mod tests {
    use crate::routes::app;
    use crate::state::AppState;
    use crate::testing::{get, send, test_config, test_state, MemoryProvider, MemoryStore};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[tokio::test]
    async fn stored_value_is_returned() {
        let store = MemoryStore::new().with_setting("subscriptions_enabled", json!(false));
        let (status, body) = send(app(test_state(store)), get("/settings/subscriptions_enabled", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "value": false }));
    }

    #[tokio::test]
    async fn absent_or_null_returns_default() {
        let store = MemoryStore::new().with_setting("character_creation_enabled", Value::Null);
        let app = app(test_state(store));

        let (status, body) = send(app.clone(), get("/settings/subscriptions_enabled", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "value": true }));

        let (status, body) = send(app, get("/settings/character_creation_enabled", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "value": true }));
    }

    #[tokio::test]
    async fn query_failure_still_succeeds_with_default() {
        let store = MemoryStore::new().failing_settings();
        let (status, body) = send(app(test_state(store)), get("/settings/subscriptions_enabled", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "value": true }));
    }

    #[tokio::test]
    async fn unconfigured_store_still_succeeds_with_default() {
        let state = AppState::new(test_config(), Arc::new(MemoryProvider::unconfigured()));
        let (status, body) = send(app(state), get("/settings/maintenance_banner", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "value": false }));
    }

    #[tokio::test]
    async fn invalid_key_is_rejected() {
        let (status, body) = send(app(test_state(MemoryStore::new())), get("/settings/Bad-Key", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid setting key" }));
    }
}
