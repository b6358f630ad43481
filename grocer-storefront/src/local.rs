//! Local durable state
//!
//! Small key/value store for per-user cart and wishlist contents and the
//! admin-edited category list. Values are JSON documents.

use crate::error::{LocalResult, LocalStoreError};
use grocer_catalog::CategoryStore;
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key holding the admin-edited category list
pub const CATEGORIES_KEY: &str = "grocery-categories";

pub fn cart_key(user_id: &str) -> String {
    format!("cart-{user_id}")
}

pub fn wishlist_key(user_id: &str) -> String {
    format!("wishlist-{user_id}")
}

/// String key/value store
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> LocalResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LocalResult<()>;
    fn remove(&self, key: &str) -> LocalResult<()>;
}

/// Store that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> LocalResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LocalResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LocalResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// Store keeping one `{key}.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    /// Open (and create if needed) the state directory
    pub fn open(dir: impl AsRef<Path>) -> LocalResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened local state directory");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> LocalResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(LocalStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> LocalResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> LocalResult<()> {
        let path = self.path_for(key)?;
        // Write then rename so a crash never leaves a half-written value
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> LocalResult<()> {
        match std::fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Load and decode a JSON value
///
/// A value that no longer decodes is logged and treated as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> LocalResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable local state");
            Ok(None)
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> LocalResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Saved category list, or the defaults when nothing was saved
pub fn load_categories(store: &dyn LocalStore) -> LocalResult<CategoryStore> {
    Ok(match load_json(store, CATEGORIES_KEY)? {
        Some(saved) => CategoryStore::from_categories(saved),
        None => CategoryStore::new(),
    })
}

pub fn save_categories(store: &dyn LocalStore, categories: &CategoryStore) -> LocalResult<()> {
    save_json(store, CATEGORIES_KEY, &categories.snapshot())
}
