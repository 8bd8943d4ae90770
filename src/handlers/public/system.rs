// handlers/public/system.rs - GET / and GET /health handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// GET / - service descriptor
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "public": ["/health", "/auth/status", "/settings/:key"],
            "protected": ["/api/me", "/api/prompts", "/api/favorites"],
            "admin": [
                "/api/admin/revenue-summary",
                "/api/admin/revenue-summary/lifetime",
                "/api/admin/activity/recent",
                "/api/admin/settings/:key",
                "/api/admin/maintenance/:script"
            ]
        }
    }))
}

/// GET /health - 200 when the service client can reach the database, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let database = match state.provider.service() {
        Ok(store) => store.ping().await,
        Err(e) => Err(e),
    };

    match database {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "environment": state.config.environment,
                "database": "connected"
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check degraded");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "environment": state.config.environment,
                    "database": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::app;
    use crate::state::AppState;
    use crate::testing::{get, send, test_config, test_state, MemoryProvider, MemoryStore};
    use axum::http::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn health_reports_connected_store() {
        let (status, body) = send(app(test_state(MemoryStore::new())), get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn health_degrades_without_store() {
        let state = AppState::new(test_config(), Arc::new(MemoryProvider::unconfigured()));
        let (status, body) = send(app(state), get("/health", None)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["database"], "unavailable");
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let (status, body) = send(app(test_state(MemoryStore::new())), get("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "persona-api");
    }
}
