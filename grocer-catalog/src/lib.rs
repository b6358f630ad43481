//! Grocer Catalog - category matching and canonical categories
//!
//! Product category labels are free text, inconsistently spelled, cased and
//! localized. This crate decides which canonical category a label belongs to
//! and manages the canonical categories themselves.
//!
//! # Example
//!
//! ```
//! use grocer_catalog::CategoryMatcher;
//!
//! let matcher = CategoryMatcher::default();
//! assert!(matcher.belongs_to_category("Beverages", "Milk & Juice"));
//! assert!(matcher.belongs_to_category("verdura", "Verduras"));
//! assert!(!matcher.belongs_to_category("Bread", "Fruits"));
//! ```

pub mod error;
pub mod matcher;
pub mod normalize;
pub mod slug;
pub mod store;
pub mod synonyms;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use matcher::{
    belongs_to_category, products_in_category, Categorized, CategoryFilter, CategoryMatcher,
};
pub use normalize::normalize;
pub use slug::slugify;
pub use store::{default_categories, CategoryStore};
pub use synonyms::{Resolution, SynonymEntry, SynonymTable};
