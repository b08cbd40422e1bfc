// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running, e.g.
//! `FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test firestore_integration`.
//!
//! The emulator keeps data between tests, so every test works on its own
//! owner/buyer email.

use eatopia::db::{DocumentId, DocumentStore};
use eatopia::models::{FoodItem, FoodUpdate, PurchasePatch, PurchaseRecord};
use serde_json::{json, Value};

mod common;
use common::test_db;

/// Generate a unique email for test isolation.
fn unique_email() -> String {
    let id = DocumentId::generate().unwrap();
    format!("{id}@example.com")
}

fn test_food(name: &str, owner_email: &str) -> FoodItem {
    FoodItem {
        name: Some(json!(name)),
        quantity: Some(json!(10)),
        price: Some(json!(5)),
        owner_email: Some(json!(owner_email)),
        ..Default::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// FOOD TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_food_insert_and_get() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_email();

    let inserted = db.insert_food(test_food("Pizza", &owner)).await.unwrap();
    let id: DocumentId = inserted.inserted_id.parse().unwrap();

    let fetched = db.get_food(&id).await.unwrap().expect("food should exist");
    assert_eq!(fetched.id.as_deref(), Some(id.as_str()));
    assert_eq!(fetched.name(), Some("Pizza"));
    assert_eq!(fetched.quantity, Some(json!(10)));
    assert_eq!(fetched.price, Some(json!(5)));

    let missing = DocumentId::generate().unwrap();
    assert!(db.get_food(&missing).await.unwrap().is_none());

    println!("✓ Food inserted and read back: id={}", id);
}

#[tokio::test]
async fn test_food_patch_and_replace() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_email();
    let inserted = db.insert_food(test_food("Pizza", &owner)).await.unwrap();
    let id: DocumentId = inserted.inserted_id.parse().unwrap();

    let patched = db
        .patch_food(
            &id,
            PurchasePatch {
                remaining: json!(8),
                purchase_quantity: json!(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.quantity, Some(json!(8)));
    assert_eq!(patched.total_purchase, Some(json!(2)));
    assert_eq!(patched.name(), Some("Pizza"));

    let result = db
        .replace_food(
            &id,
            FoodUpdate {
                name: json!("Calzone"),
                owner_email: json!(owner),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.matched_count, 1);

    let fetched = db.get_food(&id).await.unwrap().unwrap();
    assert_eq!(fetched.name(), Some("Calzone"));
    assert_eq!(fetched.quantity, Some(Value::Null));
    assert_eq!(fetched.total_purchase, Some(json!(2)));
}

#[tokio::test]
async fn test_food_upsert_creates_document() {
    require_emulator!();

    let db = test_db().await;
    let id = DocumentId::generate().unwrap();

    let result = db
        .replace_food(
            &id,
            FoodUpdate {
                name: json!("Soup"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.upserted_id.as_deref(), Some(id.as_str()));

    let fetched = db.get_food(&id).await.unwrap().unwrap();
    assert_eq!(fetched.id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn test_foods_by_owner_and_search() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_email();
    let marker = owner.replace('@', "-");

    db.insert_food(test_food(&format!("Pizza {marker}"), &owner))
        .await
        .unwrap();
    db.insert_food(test_food(&format!("Ramen {marker}"), &owner))
        .await
        .unwrap();

    let owned = db.foods_by_owner(&owner).await.unwrap();
    assert_eq!(owned.len(), 2);

    let found = db
        .search_foods(&format!("PIZZA {}", marker.to_uppercase()))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert!(db.count_foods().await.unwrap() >= 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// PURCHASE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_purchase_insert_list_delete() {
    require_emulator!();

    let db = test_db().await;
    let buyer_email = unique_email();

    let record = PurchaseRecord {
        quantity: Some(json!(2)),
        buyer: Some(json!({ "email": buyer_email.clone() })),
        ..Default::default()
    };
    let inserted = db.insert_purchase(record).await.unwrap();
    let id: DocumentId = inserted.inserted_id.parse().unwrap();

    let orders = db.purchases_by_buyer(&buyer_email).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].buyer_email(), Some(buyer_email.as_str()));

    assert_eq!(db.delete_purchase(&id).await.unwrap().deleted_count, 1);
    assert_eq!(db.delete_purchase(&id).await.unwrap().deleted_count, 0);
    assert!(db.purchases_by_buyer(&buyer_email).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_closed_store_rejects_calls() {
    require_emulator!();

    let db = test_db().await;
    db.close().await;

    assert!(db.count_foods().await.is_err());
}
