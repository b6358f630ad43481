//! Per-shopper cart and wishlist state
//!
//! Contents belong to the signed-in user and are saved to the
//! [`LocalStore`] after every change. Signed out, both are empty and every
//! mutation is refused.

use crate::cart::Cart;
use crate::local::{LocalStore, cart_key, load_json, save_json, wishlist_key};
use crate::wishlist::Wishlist;
use shared::error::{AppError, AppResult};
use shared::models::Product;
use std::sync::Arc;

pub struct ShopperState {
    store: Arc<dyn LocalStore>,
    user_id: Option<String>,
    cart: Cart,
    wishlist: Wishlist,
}

impl std::fmt::Debug for ShopperState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopperState")
            .field("user_id", &self.user_id)
            .field("cart_items", &self.cart.item_count())
            .field("wishlist_items", &self.wishlist.len())
            .finish()
    }
}

impl ShopperState {
    /// Signed-out state
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            user_id: None,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
        }
    }

    /// Switch to `user_id`, loading their saved cart and wishlist
    pub fn sign_in(&mut self, user_id: &str) -> AppResult<()> {
        self.cart = load_json(self.store.as_ref(), &cart_key(user_id))?.unwrap_or_default();
        self.wishlist =
            load_json(self.store.as_ref(), &wishlist_key(user_id))?.unwrap_or_default();
        self.user_id = Some(user_id.to_string());
        tracing::debug!(
            user_id,
            cart_items = self.cart.item_count(),
            wishlist_items = self.wishlist.len(),
            "Loaded shopper state"
        );
        Ok(())
    }

    /// Forget the in-memory contents; saved state stays for the next sign-in
    pub fn sign_out(&mut self) {
        self.user_id = None;
        self.cart.clear();
        self.wishlist.clear();
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    fn require_user(&self) -> AppResult<String> {
        self.user_id.clone().ok_or_else(AppError::not_authenticated)
    }

    fn save_cart(&self, user_id: &str) -> AppResult<()> {
        save_json(self.store.as_ref(), &cart_key(user_id), &self.cart)?;
        Ok(())
    }

    fn save_wishlist(&self, user_id: &str) -> AppResult<()> {
        save_json(self.store.as_ref(), &wishlist_key(user_id), &self.wishlist)?;
        Ok(())
    }

    /// Add one unit; returns the line's new quantity
    pub fn add_to_cart(&mut self, product: &Product) -> AppResult<u32> {
        let user_id = self.require_user()?;
        let quantity = self.cart.add(product);
        self.save_cart(&user_id)?;
        Ok(quantity)
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> AppResult<bool> {
        let user_id = self.require_user()?;
        let removed = self.cart.remove(product_id);
        if removed {
            self.save_cart(&user_id)?;
        }
        Ok(removed)
    }

    pub fn clear_cart(&mut self) -> AppResult<()> {
        let user_id = self.require_user()?;
        self.cart.clear();
        self.save_cart(&user_id)
    }

    /// Returns `false` if the product was already saved
    pub fn add_to_wishlist(&mut self, product: &Product) -> AppResult<bool> {
        let user_id = self.require_user()?;
        let added = self.wishlist.add(product);
        if added {
            self.save_wishlist(&user_id)?;
        }
        Ok(added)
    }

    pub fn remove_from_wishlist(&mut self, product_id: &str) -> AppResult<bool> {
        let user_id = self.require_user()?;
        let removed = self.wishlist.remove(product_id);
        if removed {
            self.save_wishlist(&user_id)?;
        }
        Ok(removed)
    }

    pub fn clear_wishlist(&mut self) -> AppResult<()> {
        let user_id = self.require_user()?;
        self.wishlist.clear();
        self.save_wishlist(&user_id)
    }

    /// After a successful order: drop purchased products from the wishlist
    /// and empty the cart. Returns the ids removed from the wishlist.
    pub fn complete_purchase(&mut self) -> AppResult<Vec<String>> {
        let user_id = self.require_user()?;
        let purchased: Vec<String> = self
            .cart
            .product_ids()
            .into_iter()
            .filter(|id| self.wishlist.contains(id))
            .collect();

        if self.wishlist.remove_many(purchased.as_slice()) > 0 {
            self.save_wishlist(&user_id)?;
        }
        self.cart.clear();
        self.save_cart(&user_id)?;

        tracing::info!(user_id = %user_id, removed = purchased.len(), "Purchase completed");
        Ok(purchased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::MemoryLocalStore;
    use rust_decimal::Decimal;
    use shared::error::ErrorCode;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: Decimal::new(250, 2),
            original_price: None,
            image: String::new(),
            quantity: "1 pc".to_string(),
            category: "Fruits".to_string(),
        }
    }

    #[test]
    fn test_signed_out_mutations_are_refused() {
        let mut state = ShopperState::new(Arc::new(MemoryLocalStore::new()));
        let err = state.add_to_cart(&product("1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        let err = state.add_to_wishlist(&product("1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_state_is_per_user_and_persisted() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryLocalStore::new());
        let mut state = ShopperState::new(Arc::clone(&store));

        state.sign_in("u1").unwrap();
        state.add_to_cart(&product("1")).unwrap();
        state.add_to_cart(&product("1")).unwrap();
        state.add_to_wishlist(&product("2")).unwrap();

        state.sign_out();
        assert!(state.cart().is_empty());

        state.sign_in("u2").unwrap();
        assert!(state.cart().is_empty());
        assert!(state.wishlist().is_empty());

        let mut fresh = ShopperState::new(store);
        fresh.sign_in("u1").unwrap();
        assert_eq!(fresh.cart().item_count(), 2);
        assert!(fresh.wishlist().contains("2"));
    }

    #[test]
    fn test_duplicate_wishlist_add() {
        let mut state = ShopperState::new(Arc::new(MemoryLocalStore::new()));
        state.sign_in("u1").unwrap();
        assert!(state.add_to_wishlist(&product("1")).unwrap());
        assert!(!state.add_to_wishlist(&product("1")).unwrap());
    }

    #[test]
    fn test_complete_purchase() {
        let mut state = ShopperState::new(Arc::new(MemoryLocalStore::new()));
        state.sign_in("u1").unwrap();
        state.add_to_wishlist(&product("1")).unwrap();
        state.add_to_wishlist(&product("3")).unwrap();
        state.add_to_cart(&product("1")).unwrap();
        state.add_to_cart(&product("2")).unwrap();

        let removed = state.complete_purchase().unwrap();
        assert_eq!(removed, vec!["1".to_string()]);
        assert!(state.cart().is_empty());
        assert_eq!(state.wishlist().len(), 1);
        assert!(state.wishlist().contains("3"));
    }
}
