// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT cookie authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// JWT claims structure.
///
/// The login payload is signed as submitted; `email` is the only field the
/// server interprets.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Identity compared against `email` query parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Everything else the client sent at login
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Claims {
    /// Build claims from a login body, valid for `ttl_secs` from `now`.
    ///
    /// Client-supplied `iat`/`exp` are replaced. A non-string `email` is dropped.
    pub fn from_login(mut user: Map<String, Value>, now: usize, ttl_secs: usize) -> Self {
        user.remove("iat");
        user.remove("exp");
        let email = user
            .remove("email")
            .and_then(|v| v.as_str().map(str::to_owned));

        Self {
            email,
            iat: now,
            exp: now + ttl_secs,
            profile: user,
        }
    }
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    pub fn email(&self) -> Option<&str> {
        self.claims.email.as_deref()
    }

    /// Require the token identity to equal the email a handler was asked about.
    pub fn ensure_identity(&self, requested: Option<&str>) -> Result<(), AppError> {
        match (self.email(), requested) {
            (Some(own), Some(requested)) if own == requested => Ok(()),
            _ => {
                tracing::warn!(
                    token_email = ?self.email(),
                    requested_email = ?requested,
                    "Identity mismatch"
                );
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Middleware that requires a valid session cookie.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let claims = decode_jwt(&token, &state.config.jwt_signing_key)?;
    request.extensions_mut().insert(AuthUser { claims });

    Ok(next.run(request).await)
}

/// Verify a session token and return its claims.
pub fn decode_jwt(token: &str, signing_key: &[u8]) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::InvalidToken
        })
}

/// Create a JWT for a user session.
pub fn create_jwt(claims: &Claims, signing_key: &[u8]) -> anyhow::Result<String> {
    Ok(encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
