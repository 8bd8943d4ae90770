//! Per-request session context derived from cookies or a bearer token.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Anonymous,
    User,
    Admin,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub authenticated: bool,
    pub subject: Option<Uuid>,
    pub role: Role,
    pub claims: Option<Claims>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            subject: None,
            role: Role::Anonymous,
            claims: None,
        }
    }

    pub fn from_claims(claims: Claims) -> Self {
        Self {
            authenticated: true,
            subject: Some(claims.sub),
            role: Role::User,
            claims: Some(claims),
        }
    }

    pub fn into_admin(mut self) -> Self {
        self.role = Role::Admin;
        self
    }

    /// Build the session for a request. Invalid or expired tokens yield an
    /// anonymous session; the authorization layer decides what that means.
    pub fn resolve(headers: &HeaderMap, auth: &AuthConfig) -> Self {
        let Some(token) = extract_access_token(headers, auth) else {
            return Self::anonymous();
        };

        match auth::verify_access_token(&token, auth) {
            Ok(claims) => Self::from_claims(claims),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                Self::anonymous()
            }
        }
    }
}

/// Parse every `Cookie` header into name/value pairs. Later duplicates win.
pub fn cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

/// True when any recognized session credential cookie is present and
/// non-empty. This is a UX liveness check, not an authorization decision.
pub fn has_session_credential(headers: &HeaderMap, auth: &AuthConfig) -> bool {
    let jar = cookies(headers);
    [&auth.access_cookie, &auth.refresh_cookie, &auth.legacy_cookie]
        .into_iter()
        .any(|name| jar.get(name.as_str()).is_some_and(|v| !v.is_empty()))
}

/// Locate the access token: `Authorization: Bearer`, then the access-token
/// cookie, then the legacy combined cookie.
pub fn extract_access_token(headers: &HeaderMap, auth: &AuthConfig) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token);
    }

    let jar = cookies(headers);
    if let Some(token) = jar.get(&auth.access_cookie).filter(|v| !v.is_empty()) {
        return Some(token.clone());
    }

    jar.get(&auth.legacy_cookie).and_then(|v| legacy_access_token(v))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// The legacy cookie stores either a bare token or a JSON array whose first
/// element is the access token.
fn legacy_access_token(value: &str) -> Option<String> {
    if value.starts_with('[') {
        let parts: Vec<serde_json::Value> = serde_json::from_str(value).ok()?;
        return parts.first()?.as_str().filter(|s| !s.is_empty()).map(str::to_string);
    }
    (!value.is_empty()).then(|| value.to_string())
}
