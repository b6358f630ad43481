//! Bilingual category synonym table
//!
//! Maps a normalized canonical category key (e.g. `"milkjuice"`) to the
//! normalized labels that count as that category (English/Spanish, singular
//! and plural). The built-in table is loaded from
//! `data/category_synonyms.json` at compile time; alternate tables can be
//! loaded from a file at startup.
//!
//! Entries keep their declaration order. The fuzzy lookup stops at the first
//! matching entry, so earlier entries win ties.

use crate::error::{CatalogError, CatalogResult};
use crate::normalize::normalize;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// The built-in table, parsed once per process.
static BUILTIN: LazyLock<Arc<SynonymTable>> = LazyLock::new(|| {
    let json = include_str!("../data/category_synonyms.json");
    Arc::new(SynonymTable::from_json(json).expect("built-in category_synonyms.json is invalid"))
});

/// Raw entry as written in the JSON data file
#[derive(Debug, Deserialize)]
struct RawEntry {
    key: String,
    synonyms: Vec<String>,
}

/// One canonical key and its synonym set (all normalized)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymEntry {
    pub key: String,
    pub synonyms: Vec<String>,
}

impl SynonymEntry {
    /// Key or any synonym is a substring of `title`, or contains it
    fn overlaps(&self, title: &str) -> bool {
        let related = |s: &str| s.contains(title) || title.contains(s);
        related(&self.key) || self.synonyms.iter().any(|s| related(s))
    }
}

/// How a title was resolved to its synonym set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The title is a key of the table
    Direct(&'a SynonymEntry),
    /// First entry whose key or synonyms overlap the title
    Fuzzy(&'a SynonymEntry),
    /// Nothing matched; the title stands for itself
    Fallback(String),
}

impl Resolution<'_> {
    /// The synonym set; never empty for tables built through [`SynonymTable`]
    pub fn synonyms(&self) -> Vec<&str> {
        match self {
            Resolution::Direct(entry) | Resolution::Fuzzy(entry) => {
                entry.synonyms.iter().map(String::as_str).collect()
            }
            Resolution::Fallback(title) => vec![title.as_str()],
        }
    }

    /// Canonical key that was matched, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Resolution::Direct(entry) | Resolution::Fuzzy(entry) => Some(&entry.key),
            Resolution::Fallback(_) => None,
        }
    }
}

/// Immutable, ordered synonym table
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: Vec<SynonymEntry>,
    /// key -> position in `entries`
    index: HashMap<String, usize>,
}

impl SynonymTable {
    /// Shared handle to the built-in table
    pub fn builtin() -> Arc<SynonymTable> {
        Arc::clone(&BUILTIN)
    }

    /// Build a table from `(key, synonyms)` pairs in declaration order.
    ///
    /// Keys and synonyms are normalized. Empty keys, duplicate keys and
    /// entries without synonyms are rejected.
    pub fn new<I, K, S>(pairs: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = (K, Vec<S>)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for (raw_key, raw_synonyms) in pairs {
            let key = normalize(raw_key.as_ref());
            if key.is_empty() {
                return Err(CatalogError::InvalidSynonyms(format!(
                    "key {:?} normalizes to an empty string",
                    raw_key.as_ref()
                )));
            }

            let synonyms: Vec<String> = raw_synonyms
                .iter()
                .map(|s| normalize(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect();
            if synonyms.is_empty() {
                return Err(CatalogError::InvalidSynonyms(format!(
                    "key {key:?} has no synonyms"
                )));
            }

            if index.insert(key.clone(), entries.len()).is_some() {
                return Err(CatalogError::InvalidSynonyms(format!(
                    "duplicate key {key:?}"
                )));
            }
            entries.push(SynonymEntry { key, synonyms });
        }

        Ok(Self { entries, index })
    }

    /// Parse a JSON array of `{ "key": ..., "synonyms": [...] }` objects
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        Self::new(raw.into_iter().map(|e| (e.key, e.synonyms)))
    }

    /// Load a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            "Loaded category synonym table"
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[SynonymEntry] {
        &self.entries
    }

    /// Exact key lookup
    pub fn get(&self, key: &str) -> Option<&SynonymEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Resolve an already-normalized category title.
    ///
    /// 1. Direct key lookup.
    /// 2. Otherwise the first entry (declaration order) whose key or any
    ///    synonym contains the title or is contained in it.
    /// 3. Otherwise the title itself.
    pub fn resolve(&self, normalized_title: &str) -> Resolution<'_> {
        if let Some(entry) = self.get(normalized_title) {
            return Resolution::Direct(entry);
        }

        match self.entries.iter().find(|e| e.overlaps(normalized_title)) {
            Some(entry) => {
                tracing::debug!(
                    title = normalized_title,
                    key = %entry.key,
                    "Category title resolved by fuzzy lookup"
                );
                Resolution::Fuzzy(entry)
            }
            None => Resolution::Fallback(normalized_title.to_string()),
        }
    }

    /// Synonym set for an already-normalized title (owned copy of [`resolve`](Self::resolve))
    pub fn resolve_synonyms(&self, normalized_title: &str) -> Vec<String> {
        self.resolve(normalized_title)
            .synonyms()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_parses() {
        let table = SynonymTable::builtin();
        assert_eq!(table.len(), 19);
        assert_eq!(table.entries()[0].key, "vegetables");
        assert_eq!(table.entries()[18].key, "meatpoultry");
    }

    #[test]
    fn test_direct_lookup() {
        let table = SynonymTable::builtin();
        let resolution = table.resolve("milkjuice");
        assert!(matches!(resolution, Resolution::Direct(_)));
        assert_eq!(
            resolution.synonyms(),
            vec!["dairy", "milk", "juice", "beverages", "beverage", "lacteos", "leche"]
        );
    }

    #[test]
    fn test_fuzzy_lookup_by_key_substring() {
        let table = SynonymTable::builtin();
        // "freshvegetables" contains the key "vegetables"
        let resolution = table.resolve("freshvegetables");
        assert!(matches!(resolution, Resolution::Fuzzy(_)));
        assert_eq!(resolution.key(), Some("vegetables"));
    }

    #[test]
    fn test_fuzzy_lookup_by_synonym() {
        let table = SynonymTable::builtin();
        // "rice" only appears as a synonym of the grains entries
        let resolution = table.resolve("rice");
        assert_eq!(resolution.key(), Some("grains"));

        // "eggs" is a synonym; the first declared compound entry wins
        let resolution = table.resolve("eggs");
        assert_eq!(resolution.key(), Some("chickenegg"));
    }

    #[test]
    fn test_fuzzy_first_declared_entry_wins() {
        let table = SynonymTable::new(vec![
            ("alpha", vec!["shared"]),
            ("beta", vec!["shared"]),
        ])
        .unwrap();
        assert_eq!(table.resolve("sharedthing").key(), Some("alpha"));
    }

    #[test]
    fn test_fallback_is_singleton_title() {
        let table = SynonymTable::builtin();
        let resolution = table.resolve("xyzzy");
        assert_eq!(resolution, Resolution::Fallback("xyzzy".to_string()));
        assert_eq!(table.resolve_synonyms("xyzzy"), vec!["xyzzy".to_string()]);
    }

    #[test]
    fn test_short_key_overlap_is_preserved() {
        // "pan" is a key, so any title containing it resolves to bakery.
        let table = SynonymTable::builtin();
        assert_eq!(table.resolve("spanishfood").key(), Some("bakery"));
    }

    #[test]
    fn test_new_normalizes_entries() {
        let table = SynonymTable::new(vec![("Snacks & Sweets", vec!["Snacks", "Dulces!"])]).unwrap();
        let entry = table.get("snackssweets").unwrap();
        assert_eq!(entry.synonyms, vec!["snacks", "dulces"]);
    }

    #[test]
    fn test_rejects_duplicate_key() {
        let err = SynonymTable::new(vec![("Fruits", vec!["fruit"]), ("fruits", vec!["fruta"])])
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSynonyms(_)));
    }

    #[test]
    fn test_rejects_empty_key_and_empty_synonyms() {
        assert!(SynonymTable::new(vec![("&&", vec!["x"])]).is_err());
        assert!(SynonymTable::new(vec![("frozen", Vec::<String>::new())]).is_err());
        assert!(SynonymTable::new(vec![("frozen", vec!["!!"])]).is_err());
    }

    #[test]
    fn test_from_json_keeps_order() {
        let json = r#"[
            {"key": "zeta", "synonyms": ["z"]},
            {"key": "alpha", "synonyms": ["a"]}
        ]"#;
        let table = SynonymTable::from_json(json).unwrap();
        let keys: Vec<&str> = table.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = SynonymTable::from_json(r#"{"vegetables": ["veg"]}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, r#"[{"key": "frozen", "synonyms": ["frozen", "congelados"]}]"#)
            .unwrap();

        let table = SynonymTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("frozen").is_some());

        let missing = SynonymTable::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, CatalogError::Io(_)));
    }
}
