// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food listing model for storage and API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Food listing stored in the `food` collection.
///
/// Listings are stored exactly as the client posts them: the known fields
/// keep whatever JSON value was sent (a `"5"` price stays a string, `5`
/// stays an integer), and anything else is carried through in `extra`.
/// Handlers read the few fields they need through the accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Document ID (assigned by the store on insert)
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Value>,
    /// Image URL
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Value>,
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Value>,
    /// Units still available
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<Value>,
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Value>,
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_name: Option<Value>,
    /// Email of the listing owner (used by "my foods")
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_email: Option<Value>,
    /// Country or region of origin
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin: Option<Value>,
    /// Free-text description
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub desc: Option<Value>,
    /// Cumulative units purchased (used for the top-sellers list)
    #[serde(
        default,
        deserialize_with = "crate::models::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_purchase: Option<Value>,
    /// Client-supplied fields with no named counterpart
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FoodItem {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_ref().and_then(Value::as_str)
    }

    /// Numeric `totalPurchase`; `None` when unset or not a number.
    pub fn total_sold(&self) -> Option<f64> {
        self.total_purchase.as_ref().and_then(Value::as_f64)
    }

    /// Case-insensitive substring match on the name.
    ///
    /// The needle is compared literally; an empty needle matches every item,
    /// including ones without a name.
    pub fn name_contains(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name()
            .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase()))
    }
}

/// Full edit of a listing (`PUT /food/{id}`).
///
/// Every field listed in [`FoodUpdate::FIELDS`] is overwritten; fields the
/// client leaves out are stored as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodUpdate {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub image: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub owner_name: Value,
    #[serde(default)]
    pub owner_email: Value,
    #[serde(default)]
    pub origin: Value,
    #[serde(default)]
    pub desc: Value,
}

impl FoodUpdate {
    /// Stored field names touched by an edit.
    pub const FIELDS: [&'static str; 9] = [
        "name",
        "image",
        "category",
        "quantity",
        "price",
        "ownerName",
        "ownerEmail",
        "origin",
        "desc",
    ];

    pub fn apply(self, item: &mut FoodItem) {
        item.name = Some(self.name);
        item.image = Some(self.image);
        item.category = Some(self.category);
        item.quantity = Some(self.quantity);
        item.price = Some(self.price);
        item.owner_name = Some(self.owner_name);
        item.owner_email = Some(self.owner_email);
        item.origin = Some(self.origin);
        item.desc = Some(self.desc);
    }

    /// Listing that holds only the edited fields.
    pub fn into_item(self, id: &str) -> FoodItem {
        let mut item = FoodItem {
            id: Some(id.to_string()),
            ..Default::default()
        };
        self.apply(&mut item);
        item
    }
}

/// Stock change after a purchase (`PATCH /food/{id}`).
///
/// Values are stored as sent; a missing one is stored as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePatch {
    /// New value for `quantity`
    #[serde(default)]
    pub remaining: Value,
    /// New value for `totalPurchase`
    #[serde(default)]
    pub purchase_quantity: Value,
}

impl PurchasePatch {
    /// Stored field names touched by the patch.
    pub const FIELDS: [&'static str; 2] = ["quantity", "totalPurchase"];

    pub fn apply(&self, item: &mut FoodItem) {
        item.quantity = Some(self.remaining.clone());
        item.total_purchase = Some(self.purchase_quantity.clone());
    }

    /// Listing that holds only the patched fields.
    pub fn to_item(&self, id: &str) -> FoodItem {
        let mut item = FoodItem {
            id: Some(id.to_string()),
            ..Default::default()
        };
        self.apply(&mut item);
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: &str) -> FoodItem {
        FoodItem {
            name: Some(json!(name)),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "name": "Pizza",
            "quantity": 10,
            "price": 5,
            "ownerEmail": "chef@example.com",
            "madeBy": { "name": "Chef" }
        });

        let item: FoodItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.name(), Some("Pizza"));
        assert_eq!(item.owner_email(), Some("chef@example.com"));
        assert_eq!(item.extra.get("madeBy"), Some(&json!({ "name": "Chef" })));

        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_values_kept_as_sent() {
        let raw = json!({
            "name": "Pizza",
            "quantity": "10",
            "price": "5",
            "origin": null,
            "totalPurchase": 3
        });

        let item: FoodItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.quantity, Some(json!("10")));
        assert_eq!(item.origin, Some(Value::Null));
        assert_eq!(item.total_sold(), Some(3.0));

        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_name_contains_ignores_case() {
        let item = named("Margherita Pizza");

        assert!(item.name_contains("pizza"));
        assert!(item.name_contains("GHER"));
        assert!(item.name_contains(""));
        assert!(!item.name_contains("burger"));
    }

    #[test]
    fn test_name_contains_is_literal() {
        let item = named("Fish (grilled)");

        assert!(item.name_contains("(grilled)"));
        assert!(!item.name_contains(".*"));
        assert!(!FoodItem::default().name_contains("a"));
    }

    #[test]
    fn test_update_nulls_missing_fields_and_keeps_counters() {
        let mut item = FoodItem {
            id: Some("abc".to_string()),
            origin: Some(json!("Italy")),
            total_purchase: Some(json!(4)),
            ..named("Old")
        };

        FoodUpdate {
            name: json!("New"),
            ..Default::default()
        }
        .apply(&mut item);

        assert_eq!(item.name(), Some("New"));
        assert_eq!(item.origin, Some(Value::Null));
        assert_eq!(item.total_purchase, Some(json!(4)));
        assert_eq!(item.id.as_deref(), Some("abc"));

        let stored = serde_json::to_value(&item).unwrap();
        assert_eq!(stored["origin"], Value::Null);
        assert!(stored.as_object().unwrap().contains_key("origin"));
    }

    #[test]
    fn test_purchase_patch_sets_both_counters() {
        let patch: PurchasePatch =
            serde_json::from_value(json!({ "remaining": 8, "purchaseQuantity": 2 })).unwrap();
        let item = patch.to_item("abc");

        assert_eq!(item.quantity, Some(json!(8)));
        assert_eq!(item.total_purchase, Some(json!(2)));
    }
}
