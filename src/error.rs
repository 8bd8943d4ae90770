// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::store::StoreError;

/// HTTP API error with a status code and a stable, client-safe message.
///
/// Provider detail never reaches the body; callers of [`ApiError::upstream`]
/// log it before the error is built.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized - no valid session where one is required
    Unauthenticated,

    // 403 Forbidden - valid session, insufficient role
    Unauthorized,

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error - the data store rejected or failed a query
    UpstreamQueryFailure(String),

    // 500 Internal Server Error - a required client could not be constructed
    NotConfigured,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamQueryFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthenticated => "Authentication required",
            ApiError::Unauthorized => "Admin access required",
            ApiError::NotFound(msg) => msg,
            ApiError::UpstreamQueryFailure(msg) => msg,
            ApiError::NotConfigured => "Service unavailable",
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::UpstreamQueryFailure(_) => "UPSTREAM_QUERY_FAILURE",
            ApiError::NotConfigured => "NOT_CONFIGURED",
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Log rejected client input under `operation` and answer 400.
    ///
    /// `detail` (an extractor rejection, a bad key) goes to the log only.
    pub fn invalid_input(operation: &str, detail: impl std::fmt::Display, public_message: &str) -> Self {
        tracing::warn!(operation, detail = %detail, "rejected request input");
        ApiError::BadRequest(public_message.to_string())
    }

    /// Log a store failure under `operation` and convert it to the taxonomy.
    ///
    /// `public_message` is the stable string the caller sees for this endpoint.
    pub fn upstream(operation: &str, public_message: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotConfigured(what) => {
                tracing::error!(operation, missing = what, "store client not configured");
                ApiError::NotConfigured
            }
            other => {
                tracing::error!(operation, error = %other, "upstream query failed");
                ApiError::UpstreamQueryFailure(public_message.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        tracing::debug!(code = self.error_code(), status = status.as_u16(), "request failed");
        (status, Json(self.to_json())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_map_to_distinct_statuses() {
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::FORBIDDEN);
        assert_ne!(ApiError::Unauthenticated.message(), ApiError::Unauthorized.message());
    }

    #[test]
    fn upstream_hides_provider_detail() {
        let err = ApiError::upstream(
            "revenue_summary",
            "Failed to load revenue",
            StoreError::Query("relation \"payments\" does not exist".to_string()),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_json(), json!({ "error": "Failed to load revenue" }));
    }

    #[test]
    fn missing_client_is_not_configured() {
        let err = ApiError::upstream("revenue_summary", "Failed to load revenue", StoreError::NotConfigured("DATABASE_URL"));
        assert_eq!(err.error_code(), "NOT_CONFIGURED");
        assert_eq!(err.to_json(), json!({ "error": "Service unavailable" }));
    }

    #[test]
    fn invalid_input_keeps_detail_out_of_the_body() {
        let err = ApiError::invalid_input(
            "revenue_summary",
            "unknown variant `weekly`, expected `monthly` or `lifetime`",
            "Invalid query parameters",
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "BAD_REQUEST");
        assert_eq!(err.to_json(), json!({ "error": "Invalid query parameters" }));
    }
}
