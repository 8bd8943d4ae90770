// handlers/elevated/maintenance.rs - POST /api/admin/maintenance/:script handler

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::services::maintenance::{self, MaintenanceError};
use crate::state::AppState;

const FAILED: &str = "Failed to apply maintenance script";

/**
 * POST /api/admin/maintenance/:script - apply scripts/maintenance/<script>.sql
 *
 * Scripts are re-applied on every call, so a second POST succeeds too.
 *
 * ```json
 * { "applied": true, "script": "fix_rls_policies", "checksum": "9c1e...",
 *   "previousRuns": 1, "appliedAt": "2026-10-18T09:12:44Z" }
 * ```
 */
pub async fn maintenance_run(State(state): State<AppState>, Path(script): Path<String>) -> ApiResult<Json<Value>> {
    let store = state
        .provider
        .service()
        .map_err(|e| ApiError::upstream("maintenance_run", FAILED, e))?;

    let run = maintenance::run_script(store.as_ref(), &state.config.maintenance.scripts_dir, &script)
        .await
        .map_err(|e| match e {
            invalid @ MaintenanceError::InvalidName(_) => {
                ApiError::invalid_input("maintenance_run", invalid, "Invalid script name")
            }
            MaintenanceError::NotFound(path) => {
                tracing::warn!(path = %path.display(), "maintenance script not found");
                ApiError::not_found("Maintenance script not found")
            }
            MaintenanceError::Apply(store_error) => ApiError::upstream("maintenance_run", FAILED, store_error),
            other => {
                tracing::error!(operation = "maintenance_run", error = %other, "maintenance script unusable");
                ApiError::UpstreamQueryFailure(FAILED.to_string())
            }
        })?;

    let mut body = serde_json::to_value(&run)
        .map_err(|e| {
            tracing::error!(operation = "maintenance_run", error = %e, "failed to encode script run");
            ApiError::UpstreamQueryFailure(FAILED.to_string())
        })?;
    if let Value::Object(map) = &mut body {
        map.insert("applied".to_string(), json!(true));
    }
    Ok(Json(body))
}
