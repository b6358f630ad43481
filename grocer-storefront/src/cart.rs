//! Shopping cart reducer

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::Product;

/// Product in the cart with how many units were added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub cart_quantity: u32,
}

impl CartItem {
    /// price × quantity
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.cart_quantity)
    }
}

/// Cart lines in the order products were first added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Add one unit; returns the line's new quantity
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.cart_quantity += 1;
            return item.cart_quantity;
        }
        self.items.push(CartItem {
            product: product.clone(),
            cart_quantity: 1,
        });
        1
    }

    /// Remove one unit; the line disappears when its last unit goes.
    ///
    /// Returns `false` when the product was not in the cart.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.product.id == product_id) else {
            return false;
        };
        if self.items[pos].cart_quantity > 1 {
            self.items[pos].cart_quantity -= 1;
        } else {
            self.items.remove(pos);
        }
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.cart_quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Ids of every product in the cart
    pub fn product_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.product.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: price.parse().unwrap(),
            original_price: None,
            image: String::new(),
            quantity: "1 pc".to_string(),
            category: "Fruits".to_string(),
        }
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = Cart::new();
        let apple = product("1", "0.50");
        assert_eq!(cart.add(&apple), 1);
        assert_eq!(cart.add(&product("2", "2.00")), 1);
        assert_eq!(cart.add(&apple), 2);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].product.id, "1");
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_remove_decrements_then_drops() {
        let mut cart = Cart::new();
        let apple = product("1", "0.50");
        cart.add(&apple);
        cart.add(&apple);

        assert!(cart.remove("1"));
        assert_eq!(cart.get("1").unwrap().cart_quantity, 1);
        assert!(cart.remove("1"));
        assert!(cart.get("1").is_none());
        assert!(!cart.remove("1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_is_exact() {
        let mut cart = Cart::new();
        let pepper = product("5", "3.49");
        cart.add(&pepper);
        cart.add(&pepper);
        cart.add(&product("7", "0.99"));
        assert_eq!(cart.subtotal(), "7.97".parse::<Decimal>().unwrap());
        assert_eq!(cart.get("5").unwrap().line_total(), "6.98".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_serialized_line_keeps_product_fields() {
        let mut cart = Cart::new();
        cart.add(&product("1", "0.50"));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json[0]["id"], "1");
        assert_eq!(json[0]["quantity"], "1 pc");
        assert_eq!(json[0]["cart_quantity"], 1);

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
