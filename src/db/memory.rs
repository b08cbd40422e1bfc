// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store.
//!
//! Each collection is a `BTreeMap` keyed by document ID behind a
//! `tokio::sync::RwLock`, so iteration order matches Firestore's default
//! ordering by document ID. Nothing survives a restart.

use super::{DocumentId, DocumentStore};
use crate::error::AppError;
use crate::models::{
    DeleteResult, FoodItem, FoodUpdate, InsertOneResult, PurchasePatch, PurchaseRecord,
    UpdateResult,
};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    foods: RwLock<BTreeMap<String, FoodItem>>,
    purchases: RwLock<BTreeMap<String, PurchaseRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_food(&self, mut item: FoodItem) -> Result<InsertOneResult, AppError> {
        let id = DocumentId::generate()?;
        item.id = Some(id.to_string());
        self.foods.write().await.insert(id.to_string(), item);
        Ok(InsertOneResult::new(id.to_string()))
    }

    async fn count_foods(&self) -> Result<u64, AppError> {
        Ok(self.foods.read().await.len() as u64)
    }

    async fn list_foods(&self, skip: u32, limit: Option<u32>) -> Result<Vec<FoodItem>, AppError> {
        let foods = self.foods.read().await;
        let page = foods.values().skip(skip as usize).cloned();
        Ok(match limit {
            Some(limit) => page.take(limit as usize).collect(),
            None => page.collect(),
        })
    }

    async fn top_foods(&self, limit: u32) -> Result<Vec<FoodItem>, AppError> {
        let mut foods: Vec<FoodItem> = self.foods.read().await.values().cloned().collect();
        // Stable sort: ties keep ID order. Listings without a numeric count sort last.
        foods.sort_by(|a, b| {
            b.total_sold()
                .partial_cmp(&a.total_sold())
                .unwrap_or(Ordering::Equal)
        });
        foods.truncate(limit as usize);
        Ok(foods)
    }

    async fn get_food(&self, id: &DocumentId) -> Result<Option<FoodItem>, AppError> {
        Ok(self.foods.read().await.get(id.as_str()).cloned())
    }

    async fn patch_food(
        &self,
        id: &DocumentId,
        patch: PurchasePatch,
    ) -> Result<FoodItem, AppError> {
        let mut foods = self.foods.write().await;
        let item = foods
            .entry(id.to_string())
            .or_insert_with(|| FoodItem {
                id: Some(id.to_string()),
                ..Default::default()
            });
        patch.apply(item);
        Ok(item.clone())
    }

    async fn replace_food(
        &self,
        id: &DocumentId,
        update: FoodUpdate,
    ) -> Result<UpdateResult, AppError> {
        let mut foods = self.foods.write().await;
        match foods.get_mut(id.as_str()) {
            Some(item) => {
                let before = item.clone();
                update.apply(item);
                Ok(UpdateResult::matched(*item != before))
            }
            None => {
                foods.insert(id.to_string(), update.into_item(id.as_str()));
                Ok(UpdateResult::upserted(id.as_str()))
            }
        }
    }

    async fn foods_by_owner(&self, owner_email: &str) -> Result<Vec<FoodItem>, AppError> {
        Ok(self
            .foods
            .read()
            .await
            .values()
            .filter(|f| f.owner_email() == Some(owner_email))
            .cloned()
            .collect())
    }

    async fn search_foods(&self, needle: &str) -> Result<Vec<FoodItem>, AppError> {
        Ok(self
            .foods
            .read()
            .await
            .values()
            .filter(|f| f.name_contains(needle))
            .cloned()
            .collect())
    }

    async fn insert_purchase(
        &self,
        mut record: PurchaseRecord,
    ) -> Result<InsertOneResult, AppError> {
        let id = DocumentId::generate()?;
        record.id = Some(id.to_string());
        self.purchases.write().await.insert(id.to_string(), record);
        Ok(InsertOneResult::new(id.to_string()))
    }

    async fn delete_purchase(&self, id: &DocumentId) -> Result<DeleteResult, AppError> {
        let removed = self.purchases.write().await.remove(id.as_str());
        Ok(DeleteResult::new(u64::from(removed.is_some())))
    }

    async fn purchases_by_buyer(
        &self,
        buyer_email: &str,
    ) -> Result<Vec<PurchaseRecord>, AppError> {
        Ok(self
            .purchases
            .read()
            .await
            .values()
            .filter(|p| p.buyer_email() == Some(buyer_email))
            .cloned()
            .collect())
    }
}
