// handlers/elevated/settings.rs - PUT /api/admin/settings/:key handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::settings;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SettingUpdate {
    pub value: Value,
}

/// PUT /api/admin/settings/:key - upsert a scalar setting.
///
/// Unlike the public read, write failures surface to the caller.
pub async fn settings_put(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<SettingUpdate>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    if !settings::is_valid_key(&key) {
        return Err(ApiError::invalid_input("settings_put", format_args!("key {:?}", key), "Invalid setting key"));
    }
    let Json(update) =
        payload.map_err(|rejection| ApiError::invalid_input("settings_put", rejection, "Invalid request body"))?;
    if !settings::is_scalar(&update.value) {
        return Err(ApiError::invalid_input(
            "settings_put",
            format_args!("non-scalar value for {}", key),
            "Setting value must be a scalar",
        ));
    }

    let store = state
        .provider
        .service()
        .map_err(|e| ApiError::upstream("settings_put", "Failed to save setting", e))?;

    let saved = store
        .upsert_setting(&key, &update.value)
        .await
        .map_err(|e| ApiError::upstream("settings_put", "Failed to save setting", e))?;

    tracing::info!(key = %saved.key, value = %saved.value, "setting updated");
    Ok(Json(json!({ "key": saved.key, "value": saved.value })))
}
