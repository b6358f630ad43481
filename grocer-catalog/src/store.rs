//! Category Store - admin-managed canonical categories
//!
//! Categories keep insertion order (navigation order). The slug is derived
//! from the title on create and recomputed whenever an update carries a
//! title. Deletion is immediate and does not check product references.

use crate::error::{CatalogError, CatalogResult};
use crate::slug::slugify;
use parking_lot::RwLock;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::snowflake_id;
use std::sync::Arc;

/// Seed categories shown before an admin customizes the list
const DEFAULT_CATEGORIES: [(&str, &str, &str); 7] = [
    ("1", "Vegetables", "/images/vegetables-icon.png"),
    ("2", "Fruits", "/images/fruits-icon.png"),
    ("3", "Milk & Juice", "/images/dairy-icon.png"),
    ("4", "Bakery", "/images/bakery-icon.png"),
    ("5", "Personal Care", "/images/personal-care-icon.png"),
    ("6", "Grains", "/images/grains-icon.png"),
    ("7", "Chicken & Egg", "/images/meat-icon.png"),
];

/// The default category list
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|&(id, title, icon)| Category {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            slug: slugify(title),
        })
        .collect()
}

fn validated_title(title: &str) -> CatalogResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// In-memory category store; clones share the same list
#[derive(Clone)]
pub struct CategoryStore {
    categories: Arc<RwLock<Vec<Category>>>,
}

impl std::fmt::Debug for CategoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryStore")
            .field("categories_count", &self.categories.read().len())
            .finish()
    }
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::from_categories(default_categories())
    }
}

impl CategoryStore {
    /// Store seeded with the default categories
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a previously saved list
    ///
    /// Slugs are re-derived so a stale saved slug cannot drift from its title.
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let categories = categories
            .into_iter()
            .map(|mut c| {
                c.slug = slugify(&c.title);
                c
            })
            .collect();
        Self {
            categories: Arc::new(RwLock::new(categories)),
        }
    }

    /// Copy of the current list, for persisting
    pub fn snapshot(&self) -> Vec<Category> {
        self.categories.read().clone()
    }

    pub fn list(&self) -> Vec<Category> {
        self.snapshot()
    }

    pub fn len(&self) -> usize {
        self.categories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.read().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Category> {
        self.categories.read().iter().find(|c| c.id == id).cloned()
    }

    /// Look up a category by slug; `None` means "not found" to the caller
    pub fn get_by_slug(&self, slug: &str) -> Option<Category> {
        self.categories.read().iter().find(|c| c.slug == slug).cloned()
    }

    /// Create a category with a fresh id and derived slug
    pub fn create(&self, data: CategoryCreate) -> CatalogResult<Category> {
        let title = validated_title(&data.title)?;
        let mut categories = self.categories.write();

        let mut id = snowflake_id().to_string();
        while categories.iter().any(|c| c.id == id) {
            id = snowflake_id().to_string();
        }

        let category = Category {
            id,
            slug: slugify(&title),
            title,
            icon: data.icon,
        };
        categories.push(category.clone());

        tracing::info!(id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Apply a partial update; a new title regenerates the slug
    pub fn update(&self, id: &str, data: CategoryUpdate) -> CatalogResult<Category> {
        let title = data.title.as_deref().map(validated_title).transpose()?;
        let mut categories = self.categories.write();
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogError::CategoryNotFound(id.to_string()))?;

        if let Some(title) = title {
            category.slug = slugify(&title);
            category.title = title;
        }
        if let Some(icon) = data.icon {
            category.icon = icon;
        }

        tracing::info!(id = %category.id, slug = %category.slug, "Category updated");
        Ok(category.clone())
    }

    /// Remove a category unconditionally
    pub fn delete(&self, id: &str) -> CatalogResult<Category> {
        let mut categories = self.categories.write();
        let pos = categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CatalogError::CategoryNotFound(id.to_string()))?;
        let removed = categories.remove(pos);

        tracing::info!(id = %removed.id, "Category deleted");
        Ok(removed)
    }
}
