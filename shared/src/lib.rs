//! Shared types for the grocer storefront
//!
//! Data models, the unified error system and small utilities used by both the
//! catalog and the storefront crates.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
