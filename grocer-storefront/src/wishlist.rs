//! Wishlist reducer

use serde::{Deserialize, Serialize};
use shared::models::Product;

/// Saved products, without duplicates, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|p| p.id == product_id)
    }

    /// Returns `false` if the product is already saved
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product.clone());
        true
    }

    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        self.items.len() != before
    }

    /// Remove every listed product; returns how many were removed
    pub fn remove_many<S: AsRef<str>>(&mut self, product_ids: &[S]) -> usize {
        let before = self.items.len();
        self.items
            .retain(|p| !product_ids.iter().any(|id| id.as_ref() == p.id));
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: Decimal::ONE,
            original_price: None,
            image: String::new(),
            quantity: "1 pc".to_string(),
            category: "Bakery".to_string(),
        }
    }

    #[test]
    fn test_add_refuses_duplicates() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add(&product("1")));
        assert!(!wishlist.add(&product("1")));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut wishlist = Wishlist::new();
        wishlist.add(&product("1"));
        assert!(wishlist.remove("1"));
        assert!(!wishlist.remove("1"));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_remove_many_counts_only_present() {
        let mut wishlist = Wishlist::new();
        for id in ["1", "2", "3"] {
            wishlist.add(&product(id));
        }
        assert_eq!(wishlist.remove_many(&["1", "3", "9"]), 2);
        assert!(wishlist.contains("2"));
        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.remove_many::<&str>(&[]), 0);
    }
}
