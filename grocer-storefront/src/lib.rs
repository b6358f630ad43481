//! Grocer Storefront - grocery shop over a hosted table/auth backend
//!
//! # Module layout
//!
//! ```text
//! grocer-storefront/src/
//! ├── backend/    # Backend + AuthProvider traits, in-memory and REST adapters
//! ├── api.rs      # Products, orders, auth session bootstrap, admin seeding
//! ├── local.rs    # Local key/value state (cart, wishlist, categories)
//! ├── cart.rs     # Cart reducer
//! ├── wishlist.rs # Wishlist reducer
//! ├── state.rs    # Per-shopper cart/wishlist persistence
//! ├── checkout.rs # Totals and order payloads
//! ├── config.rs   # Environment configuration
//! └── logger.rs   # tracing setup
//! ```
//!
//! Category matching itself lives in `grocer_catalog`.

pub mod api;
pub mod backend;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod local;
pub mod logger;
pub mod state;
pub mod wishlist;

// Re-exports
pub use api::{CategoryListing, StorefrontApi};
pub use backend::{AuthProvider, Backend, MemoryBackend, RestBackend, SignUpOutcome};
pub use cart::{Cart, CartItem};
pub use checkout::{CheckoutSummary, ShippingDetails};
pub use config::StorefrontConfig;
pub use error::{BackendError, BackendResult, LocalResult, LocalStoreError};
pub use local::{FileLocalStore, LocalStore, MemoryLocalStore};
pub use logger::{init_logger, init_logger_with_file};
pub use state::ShopperState;
pub use wishlist::Wishlist;

use shared::models::ProductCreate;

/// Demo catalog used to seed empty backends
pub fn sample_products() -> serde_json::Result<Vec<ProductCreate>> {
    serde_json::from_str(include_str!("../data/sample_products.json"))
}

/// Load `.env`, read the configuration and start logging
pub fn setup_environment() -> StorefrontConfig {
    dotenv::dotenv().ok();
    let config = StorefrontConfig::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_products_parse() {
        let products = sample_products().unwrap();
        assert_eq!(products.len(), 8);
        assert!(products.iter().all(|p| p.price > rust_decimal::Decimal::ZERO));
        assert_eq!(products[5].category, "Beverages");
    }
}
