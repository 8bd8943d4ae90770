// handlers/public/auth.rs - GET /auth/status handler

use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::session::has_session_credential;
use crate::state::AppState;

/// GET /auth/status - does the browser hold any session credential?
///
/// Answers from cookie presence alone (access, refresh or legacy combined
/// token). Nothing is verified here; protected routes do that.
///
/// ```json
/// { "authenticated": true }
/// ```
pub async fn auth_status(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let authenticated = has_session_credential(&headers, &state.config.auth);
    Json(json!({ "authenticated": authenticated }))
}

#[cfg(test)]
mod tests {
    use crate::routes::app;
    use crate::testing::{send, test_state, MemoryStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    fn status_request(cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/auth/status");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn refresh_cookie_alone_is_authenticated() {
        let app = app(test_state(MemoryStore::new()));
        let (status, body) = send(app, status_request(Some("sb-refresh-token=abc"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "authenticated": true }));
    }

    #[tokio::test]
    async fn no_credentials_is_anonymous() {
        let app = app(test_state(MemoryStore::new()));
        let (status, body) = send(app, status_request(Some("theme=dark"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "authenticated": false }));
    }
}
