// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod food;
pub mod purchase;
pub mod results;

pub use food::{FoodItem, FoodUpdate, PurchasePatch};
pub use purchase::PurchaseRecord;
pub use results::{DeleteResult, InsertOneResult, UpdateResult};

/// Deserialize a field that is present in the document, keeping an explicit
/// `null` as `Some(Value::Null)` so it is written back unchanged.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
