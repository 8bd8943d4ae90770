// handlers/protected/me.rs - GET /api/me handler

use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::session::SessionContext;

/**
 * GET /api/me - the verified identity behind the session
 *
 * ```json
 * { "id": "8f0c...", "email": "ada@example.com", "role": "authenticated" }
 * ```
 */
pub async fn me_get(Extension(session): Extension<SessionContext>) -> ApiResult<Json<Value>> {
    let claims = session.claims.as_ref().ok_or(ApiError::Unauthenticated)?;
    Ok(Json(json!({
        "id": claims.sub,
        "email": claims.email,
        "role": claims.role,
    })))
}

#[cfg(test)]
mod tests {
    use crate::routes::app;
    use crate::testing::{get, send, test_state, token_for, MemoryStore};
    use axum::http::StatusCode;
    use uuid::Uuid;

    #[tokio::test]
    async fn returns_token_identity() {
        let subject = Uuid::new_v4();
        let token = token_for(subject);
        let (status, body) = send(app(test_state(MemoryStore::new())), get("/api/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], subject.to_string());
        assert_eq!(body["role"], "authenticated");
    }

    #[tokio::test]
    async fn requires_session() {
        let (status, body) = send(app(test_state(MemoryStore::new())), get("/api/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");
    }

    #[tokio::test]
    async fn refresh_cookie_is_not_a_verified_session() {
        let request = axum::http::Request::builder()
            .uri("/api/me")
            .header("cookie", "sb-refresh-token=opaque")
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, _) = send(app(test_state(MemoryStore::new())), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
