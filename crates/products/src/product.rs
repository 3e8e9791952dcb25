use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use shelf_core::{ProductId, ValidationErrors};

use crate::price::Price;

/// A catalog product as persisted by the product store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(value_type = String, example = "01890a5d-ac96-774b-bcce-b302099a8057")]
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub is_premium: bool,
    #[schema(value_type = Option<f64>, example = 25.5)]
    pub price: Option<Price>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Shallow field-level merge: only fields present in `patch` change.
    ///
    /// `updated_at` is always refreshed, even for an empty patch.
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(is_premium) = patch.is_premium {
            self.is_premium = is_premium;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = now;
    }

    pub fn ensure_priced_if_premium(&self) -> Result<(), ValidationErrors> {
        premium_requires_price(self.is_premium, self.price)
    }
}

/// Data for a product that has not been stored yet (no id, no timestamps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub is_premium: bool,
    pub price: Option<Price>,
}

impl NewProduct {
    pub fn ensure_priced_if_premium(&self) -> Result<(), ValidationErrors> {
        premium_requires_price(self.is_premium, self.price)
    }

    /// Materialize the record a store persists for this input.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            is_premium: self.is_premium,
            price: self.price,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. `None` leaves a field untouched; for the nullable fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_premium: Option<bool>,
    pub price: Option<Option<Price>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_premium.is_none() && self.price.is_none()
    }
}

fn premium_requires_price(is_premium: bool, price: Option<Price>) -> Result<(), ValidationErrors> {
    let mut errs = ValidationErrors::new();
    if is_premium && price.is_none() {
        errs.push("price", "is required when isPremium is true");
    }
    errs.into_result(())
}
