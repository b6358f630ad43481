//! Checkout totals
//!
//! Money math stays in `Decimal`; only the tax is rounded (to cents,
//! half away from zero).

use crate::cart::Cart;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared::models::{OrderCreate, OrderItemCreate};

const DECIMAL_PLACES: u32 = 2;

/// Flat delivery fee (15.00)
pub const DEFAULT_DELIVERY_FEE: Decimal = Decimal::from_parts(1500, 0, 0, false, 2);
/// Sales tax rate (9%)
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 2);

/// Who the order is for and where it goes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub zip_code: String,
}

/// Totals shown on the checkout page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub subtotal: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub delivery_fee: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub tax_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
}

impl CheckoutSummary {
    pub fn from_cart(cart: &Cart, delivery_fee: Decimal, tax_rate: Decimal) -> Self {
        let subtotal = cart.subtotal();
        let tax_amount = (subtotal * tax_rate)
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal,
            delivery_fee,
            tax_amount,
            total: subtotal + delivery_fee + tax_amount,
        }
    }

    /// Order payload with one item per cart line
    pub fn into_order(self, cart: &Cart, user_id: &str, shipping: ShippingDetails) -> OrderCreate {
        let items = cart
            .items()
            .iter()
            .map(|line| OrderItemCreate {
                product_id: line.product.id.clone(),
                name: line.product.name.clone(),
                price: line.product.price,
                quantity: line.cart_quantity,
                total: line.line_total(),
                image: line.product.image.clone(),
            })
            .collect();

        OrderCreate {
            user_id: user_id.to_string(),
            customer_name: shipping.customer_name,
            email: shipping.email,
            phone: shipping.phone,
            address: shipping.address,
            zip_code: shipping.zip_code,
            subtotal: self.subtotal,
            delivery_fee: self.delivery_fee,
            tax_amount: self.tax_amount,
            total: self.total,
            items,
        }
    }
}
