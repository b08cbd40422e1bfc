// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food listing routes.

use crate::db::{DocumentId, TOP_SELLERS_LIMIT};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FoodItem, FoodUpdate, InsertOneResult, PurchasePatch, UpdateResult};
use crate::routes::{EmailQuery, StatusResponse};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Public listing routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/count", get(count_foods))
        .route("/limit-food", get(top_foods))
        .route("/food", get(search_foods))
        .route(
            "/food/{id}",
            get(get_food).put(replace_food).patch(record_purchase),
        )
}

/// Listing routes that require a session (auth layer applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/my-foods", get(my_foods))
}

// ─── Create / Count ──────────────────────────────────────────

/// Store a new listing exactly as posted.
async fn create_food(
    State(state): State<Arc<AppState>>,
    Json(item): Json<FoodItem>,
) -> Result<Json<InsertOneResult>> {
    let result = state.db.insert_food(item).await?;
    tracing::info!(id = %result.inserted_id, "Food listing created");
    Ok(Json(result))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CountResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub count: u64,
}

async fn count_foods(State(state): State<Arc<AppState>>) -> Result<Json<CountResponse>> {
    let count = state.db.count_foods().await?;
    Ok(Json(CountResponse { count }))
}

// ─── Browse ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct PageQuery {
    /// Zero-based page number
    #[serde(default)]
    page: u32,
    /// Items per page; absent or 0 returns everything after the skip
    #[serde(default)]
    size: u32,
}

impl PageQuery {
    /// Translate to (skip, limit).
    fn window(&self) -> Result<(u32, Option<u32>)> {
        let skip = self
            .page
            .checked_mul(self.size)
            .ok_or_else(|| AppError::BadRequest("Page number causes overflow".to_string()))?;
        let limit = (self.size > 0).then_some(self.size);
        Ok((skip, limit))
    }
}

/// One page of listings.
async fn list_foods(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Json<StatusResponse<Vec<FoodItem>>>> {
    let (skip, limit) = params.window()?;
    tracing::debug!(page = params.page, size = params.size, "Fetching foods");

    let foods = state.db.list_foods(skip, limit).await?;
    Ok(Json(StatusResponse::ok(foods)))
}

/// Best sellers by cumulative purchases.
async fn top_foods(State(state): State<Arc<AppState>>) -> Result<Json<Vec<FoodItem>>> {
    Ok(Json(state.db.top_foods(TOP_SELLERS_LIMIT).await?))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: String,
}

/// Listings whose name contains the search text (case-insensitive, literal).
async fn search_foods(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<FoodItem>>> {
    let foods = state.db.search_foods(&params.search).await?;
    tracing::debug!(search = %params.search, matches = foods.len(), "Food search");
    Ok(Json(foods))
}

// ─── Single Listing ──────────────────────────────────────────

/// Look up a listing; `result` is null when it does not exist.
async fn get_food(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse<Option<FoodItem>>>> {
    let id: DocumentId = id.parse()?;
    let food = state.db.get_food(&id).await?;
    Ok(Json(StatusResponse::ok(food)))
}

/// Owner edit: overwrite the listing fields (upsert).
async fn replace_food(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<FoodUpdate>,
) -> Result<Json<UpdateResult>> {
    let id: DocumentId = id.parse()?;
    let result = state.db.replace_food(&id, update).await?;
    tracing::info!(
        id = %id,
        matched = result.matched_count,
        upserted = result.upserted_count,
        "Food listing replaced"
    );
    Ok(Json(result))
}

/// Stock bookkeeping after a purchase (upsert). The client computes both
/// values; nothing here checks them against the previous stock.
async fn record_purchase(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PurchasePatch>,
) -> Result<Json<FoodItem>> {
    let id: DocumentId = id.parse()?;
    tracing::info!(
        id = %id,
        remaining = %patch.remaining,
        purchase_quantity = %patch.purchase_quantity,
        "Updating food stock"
    );
    Ok(Json(state.db.patch_food(&id, patch).await?))
}

// ─── Owner View ──────────────────────────────────────────────

/// Listings owned by the signed-in user.
async fn my_foods(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Vec<FoodItem>>> {
    let email = params.require_owner(&user)?;
    Ok(Json(state.db.foods_by_owner(email).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window() {
        let q = PageQuery { page: 2, size: 9 };
        assert_eq!(q.window().unwrap(), (18, Some(9)));

        let q = PageQuery { page: 3, size: 0 };
        assert_eq!(q.window().unwrap(), (0, None));
    }

    #[test]
    fn test_page_window_overflow() {
        let q = PageQuery {
            page: u32::MAX,
            size: 2,
        };
        assert!(matches!(q.window().unwrap_err(), AppError::BadRequest(_)));
    }
}
