// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Purchase record model for storage and API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Order placed by a buyer, stored in the `purchased` collection.
///
/// Stored exactly as posted. Nothing ties `foodId` to an existing listing,
/// and stock is adjusted by a separate call from the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// Document ID (assigned by the store on insert)
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// ID of the purchased listing
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub food_id: Option<Value>,
    /// Buyer details; `email` identifies the buyer for "my orders"
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub buyer: Option<Value>,
    /// Units bought
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<Value>,
    /// Remaining order metadata (price, date, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PurchaseRecord {
    pub fn buyer_email(&self) -> Option<&str> {
        self.buyer.as_ref()?.get("email")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_buyer_email_from_nested_object() {
        let record: PurchaseRecord = serde_json::from_value(json!({
            "foodId": "65a1b2c3d4e5f60718293a4b",
            "quantity": 2,
            "buyer": { "name": "Ann", "email": "ann@example.com" },
            "buyingDate": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(record.buyer_email(), Some("ann@example.com"));
        assert_eq!(record.extra.get("buyingDate"), Some(&json!("2024-01-01")));
    }

    #[test]
    fn test_buyer_email_missing() {
        let record: PurchaseRecord = serde_json::from_value(json!({ "quantity": 1 })).unwrap();
        assert_eq!(record.buyer_email(), None);

        let record: PurchaseRecord =
            serde_json::from_value(json!({ "buyer": "ann@example.com" })).unwrap();
        assert_eq!(record.buyer_email(), None);
    }

    #[test]
    fn test_mistyped_values_kept_as_sent() {
        let raw = json!({
            "foodId": 42,
            "quantity": "2",
            "buyer": { "email": "ann@example.com", "age": "30" }
        });

        let record: PurchaseRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.buyer_email(), Some("ann@example.com"));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }
}
