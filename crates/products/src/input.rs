//! Create/update input shapes and their validation.
//!
//! Every field is optional at the serde level; validation reports all missing
//! or invalid fields at once instead of stopping at the first.

use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

use shelf_core::ValidationErrors;

use crate::price::Price;
use crate::product::{NewProduct, ProductPatch};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[schema(value_type = String, required = true, example = "Coffee")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = bool, required = true)]
    pub is_premium: Option<bool>,
    /// Required when `isPremium` is true. Non-negative, at most 2 decimals.
    #[schema(minimum = 0.0, example = 25.5)]
    pub price: Option<f64>,
}

impl CreateProductInput {
    pub fn validate(self) -> Result<NewProduct, ValidationErrors> {
        let mut errs = ValidationErrors::new();

        match self.name.as_deref() {
            None => errs.push("name", "is required"),
            Some(n) => check_name(n, &mut errs),
        }

        if self.is_premium.is_none() {
            errs.push("isPremium", "is required");
        }

        let price = self.price.and_then(|p| parse_price(p, &mut errs));
        if self.is_premium == Some(true) && self.price.is_none() {
            errs.push("price", "is required when isPremium is true");
        }

        errs.into_result(())?;
        Ok(NewProduct {
            name: self.name.unwrap_or_default(),
            description: self.description,
            is_premium: self.is_premium.unwrap_or_default(),
            price,
        })
    }
}

/// Partial update body. For `description` and `price` an explicit JSON
/// `null` clears the field, while an absent key leaves it alone.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub name: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub is_premium: Option<bool>,
    /// `null` clears the price.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>, minimum = 0.0)]
    pub price: Option<Option<f64>>,
}

impl UpdateProductInput {
    pub fn validate(self) -> Result<ProductPatch, ValidationErrors> {
        let mut errs = ValidationErrors::new();

        if let Some(n) = self.name.as_deref() {
            check_name(n, &mut errs);
        }

        let price = match self.price {
            None => None,
            Some(None) => Some(None),
            Some(Some(p)) => Some(parse_price(p, &mut errs)),
        };

        errs.into_result(())?;
        Ok(ProductPatch {
            name: self.name,
            description: self.description,
            is_premium: self.is_premium,
            price,
        })
    }
}

fn check_name(name: &str, errs: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errs.push("name", "must not be empty");
    }
}

fn parse_price(value: f64, errs: &mut ValidationErrors) -> Option<Price> {
    match Price::from_decimal(value) {
        Ok(p) => Some(p),
        Err(e) => {
            errs.push("price", e.to_string());
            None
        }
    }
}

// Distinguishes a key that is present (possibly `null`) from one that is absent;
// used together with `#[serde(default)]`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(body: serde_json::Value) -> Result<NewProduct, ValidationErrors> {
        serde_json::from_value::<CreateProductInput>(body).unwrap().validate()
    }

    fn update(body: serde_json::Value) -> Result<ProductPatch, ValidationErrors> {
        serde_json::from_value::<UpdateProductInput>(body).unwrap().validate()
    }

    #[test]
    fn premium_product_with_price() {
        let p = create(json!({ "name": "Coffee", "isPremium": true, "price": 25.50 })).unwrap();
        assert_eq!(p.name, "Coffee");
        assert!(p.is_premium);
        assert_eq!(p.price.unwrap().cents(), 2550);
        assert_eq!(p.description, None);
    }

    #[test]
    fn regular_product_without_price() {
        let p = create(json!({ "name": "Tea", "description": "Green", "isPremium": false })).unwrap();
        assert_eq!(p.price, None);
        assert_eq!(p.description.as_deref(), Some("Green"));
    }

    #[test]
    fn premium_requires_price() {
        let err = create(json!({ "name": "Coffee", "isPremium": true })).unwrap_err();
        assert!(err.has_field("price"));

        let err = create(json!({ "name": "Coffee", "isPremium": true, "price": null })).unwrap_err();
        assert!(err.has_field("price"));
    }

    #[test]
    fn reports_every_failing_field() {
        let err = create(json!({ "name": "  ", "price": 1.234 })).unwrap_err();
        assert!(err.has_field("name"));
        assert!(err.has_field("isPremium"));
        assert!(err.has_field("price"));
    }

    #[test]
    fn negative_price_is_rejected_even_when_not_premium() {
        let err = create(json!({ "name": "Tea", "isPremium": false, "price": -1 })).unwrap_err();
        assert_eq!(err.fields()[0].message, "must not be negative");
    }

    #[test]
    fn prices_with_hidden_extra_decimals_are_not_rounded() {
        for price in [25.50000001, 0.000000001] {
            let err = create(json!({ "name": "Tea", "isPremium": false, "price": price })).unwrap_err();
            assert!(err.has_field("price"), "{price} should be rejected");
            assert_eq!(err.fields()[0].message, "must have at most 2 decimal places");
        }
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let patch = update(json!({ "name": "X" })).unwrap();
        assert_eq!(patch.name.as_deref(), Some("X"));
        assert_eq!(patch.price, None);
        assert_eq!(patch.description, None);

        let patch = update(json!({ "price": null, "description": null })).unwrap();
        assert_eq!(patch.price, Some(None));
        assert_eq!(patch.description, Some(None));

        let patch = update(json!({ "price": 3.5 })).unwrap();
        assert_eq!(patch.price, Some(Some(Price::from_cents(350).unwrap())));
    }

    #[test]
    fn update_validates_present_fields() {
        let err = update(json!({ "name": "", "price": 0.001 })).unwrap_err();
        assert!(err.has_field("name"));
        assert!(err.has_field("price"));

        assert!(update(json!({})).unwrap().is_empty());
    }
}
