//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Only orders that have not shipped yet may be cancelled
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Order entity with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "super::serde_helpers::string_or_number")]
    pub id: String,
    pub user_id: String,
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: String,
    pub zip_code: String,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Populated from the `order_items` table, not stored on the order row
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(deserialize_with = "super::serde_helpers::string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "super::serde_helpers::string_or_number")]
    pub order_id: String,
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub total: Decimal,
    #[serde(default)]
    pub image: String,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub user_id: String,
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: String,
    pub zip_code: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub subtotal: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub delivery_fee: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub tax_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
    /// Inserted into `order_items` after the order row exists
    #[serde(skip_serializing, default)]
    pub items: Vec<OrderItemCreate>,
}

/// Create order item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: String,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
    pub image: String,
}
