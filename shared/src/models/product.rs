//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category label displayed when a product carries none
pub const DEFAULT_CATEGORY: &str = "General";
/// Amount label used when a row carries none
pub const DEFAULT_QUANTITY: &str = "1 pc";
/// Image used when a row carries none
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=200";

/// Product entity
///
/// `category` is a free-text label, not a reference to [`Category::id`](super::Category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub original_price: Option<Decimal>,
    pub image: String,
    /// Free-text amount label, e.g. "500g"
    pub quantity: String,
    /// Free-text category label, empty when the row carries none
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Category label for display, [`DEFAULT_CATEGORY`] when empty
    ///
    /// Matching uses the raw `category` so uncategorized products stay out
    /// of every category listing.
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }

    /// Whether the product is listed below its original price
    pub fn is_discounted(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }
}

/// Product row as stored by the backend
///
/// Optional display columns are filled with defaults when converted into a
/// [`Product`]. A missing category stays empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    #[serde(deserialize_with = "crate::models::serde_helpers::string_or_number")]
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            original_price: row.original_price,
            image: non_empty_or(row.image, PLACEHOLDER_IMAGE),
            quantity: non_empty_or(row.quantity, DEFAULT_QUANTITY),
            category: row.category.unwrap_or_default(),
        }
    }
}

/// Create product payload (admin seeding)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub original_price: Option<Decimal>,
    pub image: String,
    pub quantity: String,
    pub category: String,
}
