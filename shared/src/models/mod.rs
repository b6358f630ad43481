//! Data models
//!
//! Rows exchanged with the hosted backend and the records kept in local state.
//! Backend identifiers are carried as `String` regardless of column type.

pub mod category;
pub mod order;
pub mod product;
pub mod profile;
pub mod serde_helpers;

// Re-exports
pub use category::*;
pub use order::*;
pub use product::*;
pub use profile::*;
