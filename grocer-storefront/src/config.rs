//! Storefront configuration

use grocer_catalog::{CatalogResult, SynonymTable};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::checkout::{DEFAULT_DELIVERY_FEE, DEFAULT_TAX_RATE};

/// Storefront configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BACKEND_URL | http://localhost:54321 | Hosted backend base URL |
/// | BACKEND_ANON_KEY | (empty) | Public API key sent with every request |
/// | STATE_DIR | ./.grocer | Directory for local cart/wishlist/category state |
/// | SYNONYMS_PATH | (built-in table) | Alternate category synonym table (JSON) |
/// | DELIVERY_FEE | 15.00 | Flat delivery fee |
/// | TAX_RATE | 0.09 | Sales tax rate |
/// | PRODUCT_FETCH_LIMIT | (none) | Cap on products fetched per listing |
/// | REQUEST_TIMEOUT_MS | 30000 | Backend request timeout |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | (stdout only) | Directory for daily log files |
///
/// # Example
///
/// ```ignore
/// BACKEND_URL=https://shop.example.com STATE_DIR=/tmp/grocer cargo run
/// ```
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub backend_url: String,
    pub backend_anon_key: String,
    pub state_dir: String,
    pub synonyms_path: Option<String>,
    pub delivery_fee: Decimal,
    pub tax_rate: Decimal,
    pub product_fetch_limit: Option<usize>,
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl StorefrontConfig {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            backend_anon_key: std::env::var("BACKEND_ANON_KEY").unwrap_or_default(),
            state_dir: std::env::var("STATE_DIR").unwrap_or_else(|_| "./.grocer".into()),
            synonyms_path: env_non_empty("SYNONYMS_PATH"),
            delivery_fee: env_parse("DELIVERY_FEE").unwrap_or(DEFAULT_DELIVERY_FEE),
            tax_rate: env_parse("TAX_RATE").unwrap_or(DEFAULT_TAX_RATE),
            product_fetch_limit: env_parse("PRODUCT_FETCH_LIMIT"),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS").unwrap_or(30_000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: env_non_empty("LOG_DIR"),
        }
    }

    /// Override the state directory and backend URL
    ///
    /// Mostly used by tests
    pub fn with_overrides(state_dir: impl Into<String>, backend_url: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.state_dir = state_dir.into();
        config.backend_url = backend_url.into();
        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The configured synonym table, or the built-in one
    pub fn synonym_table(&self) -> CatalogResult<Arc<SynonymTable>> {
        match &self.synonyms_path {
            Some(path) => Ok(Arc::new(SynonymTable::load(path)?)),
            None => Ok(SynonymTable::builtin()),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
