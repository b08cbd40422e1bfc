// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Purchase routes.
//!
//! Placing an order and adjusting the listing's stock are separate calls
//! from the client; nothing here links the two collections.

use crate::db::DocumentId;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{DeleteResult, InsertOneResult, PurchaseRecord};
use crate::routes::{EmailQuery, StatusResponse};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/purchase-food", post(create_purchase))
        .route("/purchase-delete/{id}", delete(cancel_purchase))
}

/// Purchase routes that require a session (auth layer applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/orders", get(my_orders))
}

async fn create_purchase(
    State(state): State<Arc<AppState>>,
    Json(record): Json<PurchaseRecord>,
) -> Result<Json<StatusResponse<InsertOneResult>>> {
    let food_id = record.food_id.clone();
    let result = state.db.insert_purchase(record).await?;
    tracing::info!(
        id = %result.inserted_id,
        food_id = ?food_id,
        "Purchase recorded"
    );
    Ok(Json(StatusResponse::ok(result)))
}

async fn cancel_purchase(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id: DocumentId = id.parse()?;
    let result = state.db.delete_purchase(&id).await?;
    tracing::info!(id = %id, deleted = result.deleted_count, "Purchase cancelled");
    Ok(Json(result))
}

/// Orders placed by the signed-in user.
async fn my_orders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<PurchaseRecord>>> {
    let email = params.require_owner(&user)?;
    Ok(Json(state.db.purchases_by_buyer(email).await?))
}
