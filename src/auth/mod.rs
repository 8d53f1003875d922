//! Password hashing and access tokens.
//!
//! Passwords are stored as bcrypt hashes. Access tokens are HS256-signed
//! JWTs carrying the user id and a 30-minute expiry; the signing secret comes
//! from configuration. The `AuthUser` extractor enforces the bearer-token
//! contract on protected routes.

use crate::config::Config;

use anyhow::Result;
use axum::async_trait;
use axum::extract::{Extension, FromRequestParts};
use axum::http::{header, request::Parts, StatusCode};
use axum::RequestPartsExt;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Access token lifetime.
const TOKEN_TTL_SECS: i64 = 30 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Expiration time (UTC Unix timestamp), validated on decode.
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

pub fn issue_token(user_id: i64, secret: &str) -> Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;
    let claims = Claims {
        user_id,
        exp: now + TOKEN_TTL_SECS,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Validates a token and returns the user id it was issued for.
pub fn validate_token(token: &str, secret: &str) -> Result<i64> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims.user_id)
}

/// Extractor for the authenticated user id on protected routes.
///
/// Pulls the `Authorization: Bearer <token>` header and validates the token
/// against the configured secret, rejecting with 401 otherwise.
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Extension(config) = parts
            .extract::<Extension<Arc<Config>>>()
            .await
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "configuration missing"))?;

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "authorization header is required"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "invalid authorization token format"))?;

        let user_id = validate_token(token, &config.jwt_secret)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid token"))?;

        Ok(AuthUser(user_id))
    }
}
