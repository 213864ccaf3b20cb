// src/shop/models.rs
use serde::{Deserialize, Serialize};

/// Fixed-order view of a [`ProductDetails`]:
/// (current price, original price, available sizes, out-of-stock sizes, item code).
pub type ProductTuple = (Option<String>, Option<String>, Vec<String>, Vec<String>, Option<String>);

/// Structured data scraped from one product page.
/// Every field degrades independently: missing markup means `None` or an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub current_price: Option<String>,
    pub original_price: Option<String>, // "Compare at" price
    pub available_sizes: Vec<String>,
    pub out_of_stock_sizes: Vec<String>,
    pub item_code: Option<String>,
}

impl ProductDetails {
    /// The all-absent record returned when the page could not be fetched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn into_tuple(self) -> ProductTuple {
        (
            self.current_price,
            self.original_price,
            self.available_sizes,
            self.out_of_stock_sizes,
            self.item_code,
        )
    }

    /// True when a non-empty price and at least one size were found.
    pub fn has_listing(&self) -> bool {
        self.current_price.as_deref().is_some_and(|price| !price.is_empty())
            && (!self.available_sizes.is_empty() || !self.out_of_stock_sizes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_tuple_keeps_field_order() {
        let details = ProductDetails {
            current_price: Some("$120.00".into()),
            original_price: Some("$150.00".into()),
            available_sizes: vec!["S".into()],
            out_of_stock_sizes: vec!["M".into()],
            item_code: Some("I123456_AB_01".into()),
        };

        let (price, original, available, oos, code) = details.into_tuple();
        assert_eq!(price.as_deref(), Some("$120.00"));
        assert_eq!(original.as_deref(), Some("$150.00"));
        assert_eq!(available, vec!["S"]);
        assert_eq!(oos, vec!["M"]);
        assert_eq!(code.as_deref(), Some("I123456_AB_01"));
    }

    #[test]
    fn test_has_listing() {
        assert!(!ProductDetails::empty().has_listing());

        let price_only = ProductDetails { current_price: Some("$10".into()), ..Default::default() };
        assert!(!price_only.has_listing());

        let sold_out = ProductDetails {
            current_price: Some("$10".into()),
            out_of_stock_sizes: vec!["L".into()],
            ..Default::default()
        };
        assert!(sold_out.has_listing());

        let blank_price = ProductDetails {
            current_price: Some(String::new()),
            available_sizes: vec!["S".into()],
            ..Default::default()
        };
        assert!(!blank_price.has_listing());
    }
}
