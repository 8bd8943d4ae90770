use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::session::SessionContext;
use crate::state::AppState;

/// Require a verified session. Injects [`SessionContext`] for handlers.
pub async fn require_authenticated(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = SessionContext::resolve(request.headers(), &state.config.auth);
    if !session.authenticated {
        tracing::debug!(path = %request.uri().path(), "rejecting unauthenticated request");
        return Err(ApiError::Unauthenticated);
    }

    tracing::debug!(subject = ?session.subject, role = ?session.role, "session verified");
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Require a verified session whose subject is an administrator.
///
/// A subject is an administrator when its role claim equals the configured
/// admin role, or when it is listed in the admin registry.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = SessionContext::resolve(request.headers(), &state.config.auth);
    let (Some(subject), Some(claims)) = (session.subject, session.claims.as_ref()) else {
        return Err(ApiError::Unauthenticated);
    };

    let role_grants_admin = match (&state.config.auth.admin_role, &claims.role) {
        (Some(admin_role), Some(role)) => admin_role == role,
        _ => false,
    };

    let is_admin = if role_grants_admin {
        true
    } else {
        let store = state
            .provider
            .service()
            .map_err(|e| ApiError::upstream("admin_check", "Failed to verify admin access", e))?;
        store
            .is_admin(subject)
            .await
            .map_err(|e| ApiError::upstream("admin_check", "Failed to verify admin access", e))?
    };

    if !is_admin {
        tracing::warn!(%subject, path = %request.uri().path(), "non-admin attempted admin route");
        return Err(ApiError::Unauthorized);
    }

    let session = session.into_admin();
    tracing::debug!(%subject, role = ?session.role, via_role_claim = role_grants_admin, "admin access granted");
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
