// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod foods;
pub mod purchases;

use crate::error::Result;
use crate::middleware::auth::{require_auth, AuthUser};
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Plaintext body served at `/`.
pub const LIVENESS_MESSAGE: &str = "Eatopia Server is running properly";

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// `{status, result}` envelope used by several read and write endpoints.
#[derive(Serialize)]
pub struct StatusResponse<T> {
    pub status: bool,
    pub result: T,
}

impl<T> StatusResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            status: true,
            result,
        }
    }
}

/// `?email=` parameter of the per-user views.
#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

impl EmailQuery {
    /// The requested email, provided it belongs to the signed-in user.
    pub fn require_owner(&self, user: &AuthUser) -> Result<&str> {
        user.ensure_identity(self.email.as_deref())?;
        Ok(self.email.as_deref().unwrap_or_default())
    }
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - only the configured frontend may send credentialed requests
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                origin.as_bytes() == frontend_url.as_bytes()
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(foods::routes())
        .merge(purchases::routes());

    // Protected routes (session cookie required)
    let protected_routes = Router::new()
        .merge(foods::protected_routes())
        .merge(purchases::protected_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
