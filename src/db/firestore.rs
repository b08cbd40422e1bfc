// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.
//!
//! Firestore has no substring operator, so search scans the collection and
//! filters in process. Write results that need match/delete counts read the
//! document first; those read-then-write pairs are not transactional.

use super::{collections, DocumentId, DocumentStore};
use crate::error::AppError;
use crate::models::{
    DeleteResult, FoodItem, FoodUpdate, InsertOneResult, PurchasePatch, PurchaseRecord,
    UpdateResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::RwLock;

/// Stored field carrying the document ID inside each document.
const ID_FIELD: &str = "_id";

/// Firestore database client.
pub struct FirestoreStore {
    client: RwLock<Option<firestore::FirestoreDb>>,
}

/// Row returned by the count aggregation.
#[derive(Deserialize)]
struct CountAggregate {
    count: u64,
}

fn db_error(e: impl std::fmt::Display) -> AppError {
    AppError::Database(e.to_string())
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self::with_client(Some(client)))
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self::with_client(Some(client)))
    }

    /// Store with no connection; every operation returns a database error.
    pub fn new_offline() -> Self {
        Self::with_client(None)
    }

    fn with_client(client: Option<firestore::FirestoreDb>) -> Self {
        Self {
            client: RwLock::new(client),
        }
    }

    /// Clone of the live client, or an error once closed or offline.
    fn get_client(&self) -> Result<firestore::FirestoreDb, AppError> {
        self.client
            .read()
            .map_err(|_| AppError::Database("Firestore client lock poisoned".to_string()))?
            .clone()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn insert<T>(&self, collection: &str, id: &DocumentId, doc: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + for<'de> Deserialize<'de> + Send + Sync,
    {
        let client = self.get_client()?;
        let _: T = client
            .fluent()
            .insert()
            .into(collection)
            .document_id(id.as_str())
            .object(doc)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn query_foods_where(
        &self,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<FoodItem>, AppError> {
        let value = value.to_string();
        let client = self.get_client()?;
        let foods = client
            .fluent()
            .select()
            .from(collections::FOODS)
            .filter(move |q| q.field(field).eq(value.clone()))
            .obj()
            .query()
            .await
            .map_err(db_error)?;
        Ok(foods)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn insert_food(&self, mut item: FoodItem) -> Result<InsertOneResult, AppError> {
        let id = DocumentId::generate()?;
        item.id = Some(id.to_string());
        self.insert(collections::FOODS, &id, &item).await?;
        Ok(InsertOneResult::new(id.to_string()))
    }

    async fn count_foods(&self) -> Result<u64, AppError> {
        let client = self.get_client()?;
        let rows: Vec<CountAggregate> = client
            .fluent()
            .select()
            .from(collections::FOODS)
            .aggregate(|a| a.fields([a.field("count").count()]))
            .obj()
            .query()
            .await
            .map_err(db_error)?;

        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    async fn list_foods(&self, skip: u32, limit: Option<u32>) -> Result<Vec<FoodItem>, AppError> {
        let client = self.get_client()?;
        let query = client
            .fluent()
            .select()
            .from(collections::FOODS)
            .offset(skip);

        // Without an explicit order Firestore returns documents by ID.
        let query = match limit {
            Some(limit) => query.limit(limit),
            None => query,
        };

        let foods = query.obj().query().await.map_err(db_error)?;
        Ok(foods)
    }

    async fn top_foods(&self, limit: u32) -> Result<Vec<FoodItem>, AppError> {
        // Listings that never had totalPurchase set are excluded by the ordering.
        let client = self.get_client()?;
        let foods = client
            .fluent()
            .select()
            .from(collections::FOODS)
            .order_by([(
                "totalPurchase",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(db_error)?;
        Ok(foods)
    }

    async fn get_food(&self, id: &DocumentId) -> Result<Option<FoodItem>, AppError> {
        let client = self.get_client()?;
        let food = client
            .fluent()
            .select()
            .by_id_in(collections::FOODS)
            .obj()
            .one(id.as_str())
            .await
            .map_err(db_error)?;
        Ok(food)
    }

    async fn patch_food(
        &self,
        id: &DocumentId,
        patch: PurchasePatch,
    ) -> Result<FoodItem, AppError> {
        // Writing the ID field too keeps upserted documents self-describing.
        let fields = std::iter::once(ID_FIELD).chain(PurchasePatch::FIELDS);

        let client = self.get_client()?;
        let patched = client
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::FOODS)
            .document_id(id.as_str())
            .object(&patch.to_item(id.as_str()))
            .execute()
            .await
            .map_err(db_error)?;
        Ok(patched)
    }

    async fn replace_food(
        &self,
        id: &DocumentId,
        update: FoodUpdate,
    ) -> Result<UpdateResult, AppError> {
        let existing = self.get_food(id).await?;

        let fields = std::iter::once(ID_FIELD).chain(FoodUpdate::FIELDS);
        let client = self.get_client()?;
        let _: FoodItem = client
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::FOODS)
            .document_id(id.as_str())
            .object(&update.clone().into_item(id.as_str()))
            .execute()
            .await
            .map_err(db_error)?;

        Ok(match existing {
            Some(before) => {
                let mut after = before.clone();
                update.apply(&mut after);
                UpdateResult::matched(after != before)
            }
            None => UpdateResult::upserted(id.as_str()),
        })
    }

    async fn foods_by_owner(&self, owner_email: &str) -> Result<Vec<FoodItem>, AppError> {
        self.query_foods_where("ownerEmail", owner_email).await
    }

    async fn search_foods(&self, needle: &str) -> Result<Vec<FoodItem>, AppError> {
        let all: Vec<FoodItem> = self.list_foods(0, None).await?;
        Ok(all.into_iter().filter(|f| f.name_contains(needle)).collect())
    }

    async fn insert_purchase(
        &self,
        mut record: PurchaseRecord,
    ) -> Result<InsertOneResult, AppError> {
        let id = DocumentId::generate()?;
        record.id = Some(id.to_string());
        self.insert(collections::PURCHASES, &id, &record).await?;
        Ok(InsertOneResult::new(id.to_string()))
    }

    async fn delete_purchase(&self, id: &DocumentId) -> Result<DeleteResult, AppError> {
        let client = self.get_client()?;

        let existing: Option<PurchaseRecord> = client
            .fluent()
            .select()
            .by_id_in(collections::PURCHASES)
            .obj()
            .one(id.as_str())
            .await
            .map_err(db_error)?;

        if existing.is_none() {
            return Ok(DeleteResult::new(0));
        }

        client
            .fluent()
            .delete()
            .from(collections::PURCHASES)
            .document_id(id.as_str())
            .execute()
            .await
            .map_err(db_error)?;

        Ok(DeleteResult::new(1))
    }

    async fn purchases_by_buyer(
        &self,
        buyer_email: &str,
    ) -> Result<Vec<PurchaseRecord>, AppError> {
        let buyer_email = buyer_email.to_string();
        let client = self.get_client()?;
        let orders = client
            .fluent()
            .select()
            .from(collections::PURCHASES)
            .filter(move |q| q.field("buyer.email").eq(buyer_email.clone()))
            .obj()
            .query()
            .await
            .map_err(db_error)?;
        Ok(orders)
    }

    async fn close(&self) {
        match self.client.write() {
            Ok(mut client) => {
                if client.take().is_some() {
                    tracing::info!("Firestore connection closed");
                }
            }
            Err(_) => tracing::warn!("Firestore client lock poisoned during close"),
        }
    }
}
