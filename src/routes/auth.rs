// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session login and logout routes.
//!
//! Login performs no credential check: whatever object the client posts is
//! signed into the session token. The frontend authenticates users with its
//! own identity provider before calling it.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, Claims, SESSION_COOKIE};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Session cookie attributes shared by login and logout so the removal
/// cookie matches the one that was set.
fn session_cookie(config: &Config, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .build()
}

/// Sign the posted user object and set it as the session cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(user): Json<Map<String, Value>>,
) -> Result<(CookieJar, Json<SuccessResponse>)> {
    let ttl_hours = state.config.session_ttl_hours;
    let now = crate::time_utils::unix_now() as usize;
    let claims = Claims::from_login(user, now, ttl_hours as usize * 60 * 60);

    tracing::info!(email = ?claims.email, ttl_hours, "Issuing session token");

    let jwt = create_jwt(&claims, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let mut cookie = session_cookie(&state.config, jwt);
    cookie.set_max_age(time::Duration::hours(i64::from(ttl_hours)));

    Ok((jar.add(cookie), Json(SuccessResponse { success: true })))
}

/// Clear the session cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let mut removal = session_cookie(&state.config, String::new());
    removal.make_removal();

    (jar.add(removal), Json(SuccessResponse { success: true }))
}
