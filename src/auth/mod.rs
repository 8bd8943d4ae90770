use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;

/// Claims carried by the auth provider's access tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: Uuid, email: Option<String>, role: Option<String>, auth: &AuthConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(auth.dev_token_expiry_hours as i64)).timestamp();

        Self {
            sub,
            email,
            role: role.or_else(|| Some("authenticated".to_string())),
            aud: auth.jwt_audience.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("Invalid access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Verify signature, expiry and (when configured) audience of an access token.
pub fn verify_access_token(token: &str, auth: &AuthConfig) -> Result<Claims, AuthError> {
    if auth.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    match &auth.jwt_audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}

/// Sign a token with the local secret. Used by the CLI for development
/// sessions and by tests; production tokens come from the auth provider.
pub fn issue_access_token(claims: &Claims, auth: &AuthConfig) -> Result<String, AuthError> {
    if auth.jwt_secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(auth.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), claims, &encoding_key)?)
}
