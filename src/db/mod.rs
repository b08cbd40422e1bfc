// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Handlers talk to a [`DocumentStore`]; Firestore backs production and the
//! in-memory store backs local development and tests.

pub mod firestore;
pub mod id;
pub mod memory;

pub use firestore::FirestoreStore;
pub use id::DocumentId;
pub use memory::MemoryStore;

use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::models::{
    DeleteResult, FoodItem, FoodUpdate, InsertOneResult, PurchasePatch, PurchaseRecord,
    UpdateResult,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    /// Food listings
    pub const FOODS: &str = "food";
    /// Purchase records
    pub const PURCHASES: &str = "purchased";
}

/// Number of listings returned by the top-sellers query.
pub const TOP_SELLERS_LIMIT: u32 = 6;

/// Operations the HTTP layer needs from a document store.
///
/// Each method is a single store call; nothing spans both collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // ─── Foods ───────────────────────────────────────────────────

    /// Insert a listing under a freshly generated ID.
    async fn insert_food(&self, item: FoodItem) -> Result<InsertOneResult, AppError>;

    /// Number of listings (may be an estimate).
    async fn count_foods(&self) -> Result<u64, AppError>;

    /// Listings ordered by ID, skipping `skip` and returning at most `limit`.
    async fn list_foods(&self, skip: u32, limit: Option<u32>) -> Result<Vec<FoodItem>, AppError>;

    /// Listings with the highest `totalPurchase`, descending.
    async fn top_foods(&self, limit: u32) -> Result<Vec<FoodItem>, AppError>;

    async fn get_food(&self, id: &DocumentId) -> Result<Option<FoodItem>, AppError>;

    /// Overwrite `quantity` and `totalPurchase`, creating the listing if absent.
    /// Returns the listing as stored after the write.
    async fn patch_food(&self, id: &DocumentId, patch: PurchasePatch)
        -> Result<FoodItem, AppError>;

    /// Overwrite the editable listing fields, creating the listing if absent.
    async fn replace_food(
        &self,
        id: &DocumentId,
        update: FoodUpdate,
    ) -> Result<UpdateResult, AppError>;

    async fn foods_by_owner(&self, owner_email: &str) -> Result<Vec<FoodItem>, AppError>;

    /// Listings whose name contains `needle`, ignoring case.
    async fn search_foods(&self, needle: &str) -> Result<Vec<FoodItem>, AppError>;

    // ─── Purchases ───────────────────────────────────────────────

    async fn insert_purchase(&self, record: PurchaseRecord) -> Result<InsertOneResult, AppError>;

    async fn delete_purchase(&self, id: &DocumentId) -> Result<DeleteResult, AppError>;

    async fn purchases_by_buyer(&self, buyer_email: &str)
        -> Result<Vec<PurchaseRecord>, AppError>;

    // ─── Lifecycle ───────────────────────────────────────────────

    /// Release the backend connection. Backends holding a client fail later
    /// calls with a database error.
    async fn close(&self) {}
}

/// Open the store selected by configuration.
pub async fn connect(config: &Config) -> Result<Arc<dyn DocumentStore>, AppError> {
    match config.store_backend {
        StoreBackend::Firestore => Ok(Arc::new(
            FirestoreStore::new(&config.gcp_project_id).await?,
        )),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
