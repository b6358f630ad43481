//! Category Model

use serde::{Deserialize, Serialize};

/// Canonical category entity (admin-managed)
///
/// `slug` is always derived from `title`; it is never edited on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// Display name, also the key the category matcher works from
    pub title: String,
    /// Image reference
    pub icon: String,
    pub slug: String,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub title: String,
    #[serde(default)]
    pub icon: String,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub title: Option<String>,
    pub icon: Option<String>,
}
