//! Category Matcher
//!
//! Decides whether a product's free-text category label belongs to a
//! canonical category, given the category's display title.
//!
//! The title is normalized and expanded into a synonym set through the
//! [`SynonymTable`]; the product label matches when its normalized form and
//! any synonym contain one another. Matching never fails: unmapped titles
//! fall back to comparing against the title itself.
//!
//! The substring test is deliberately loose. Short keys (e.g. `"pan"`) also
//! match unrelated labels that happen to contain them.

use crate::normalize::normalize;
use crate::synonyms::SynonymTable;
use shared::models::{Category, Product};
use std::sync::Arc;

/// Anything that carries a free-text category label
pub trait Categorized {
    fn category_label(&self) -> &str;
}

impl Categorized for Product {
    fn category_label(&self) -> &str {
        &self.category
    }
}

impl Categorized for str {
    fn category_label(&self) -> &str {
        self
    }
}

impl Categorized for String {
    fn category_label(&self) -> &str {
        self
    }
}

impl<T: Categorized + ?Sized> Categorized for &T {
    fn category_label(&self) -> &str {
        (**self).category_label()
    }
}

/// A category title resolved once against the synonym table
///
/// Reused across a whole product list so the title is only expanded once.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    synonyms: Vec<String>,
}

impl CategoryFilter {
    /// Returns `None` for an empty title, which matches nothing
    pub fn new(table: &SynonymTable, category_title: &str) -> Option<Self> {
        if category_title.is_empty() {
            return None;
        }
        let title_key = normalize(category_title);
        let synonyms = table
            .resolve(&title_key)
            .synonyms()
            .into_iter()
            .map(normalize)
            .collect();
        Some(Self { synonyms })
    }

    /// Normalized synonyms this filter compares against
    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    /// Bidirectional substring test against every synonym
    pub fn accepts(&self, product_category: &str) -> bool {
        if product_category.is_empty() {
            return false;
        }
        let product_key = normalize(product_category);
        self.synonyms
            .iter()
            .any(|syn| product_key.contains(syn.as_str()) || syn.contains(product_key.as_str()))
    }
}

/// Category matcher over a shared synonym table
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    table: Arc<SynonymTable>,
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::new(SynonymTable::builtin())
    }
}

impl CategoryMatcher {
    pub fn new(table: Arc<SynonymTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SynonymTable {
        &self.table
    }

    /// Resolve a title once for repeated matching
    pub fn filter(&self, category_title: &str) -> Option<CategoryFilter> {
        CategoryFilter::new(&self.table, category_title)
    }

    /// Whether `item` belongs to the category titled `category_title`.
    ///
    /// Empty labels or titles never match.
    pub fn belongs_to_category<P: Categorized + ?Sized>(
        &self,
        item: &P,
        category_title: &str,
    ) -> bool {
        self.filter(category_title)
            .is_some_and(|f| f.accepts(item.category_label()))
    }

    /// Items belonging to the category, in input order
    pub fn partition<'p, P: Categorized>(&self, items: &'p [P], category_title: &str) -> Vec<&'p P> {
        let Some(filter) = self.filter(category_title) else {
            return Vec::new();
        };
        let matched: Vec<&P> = items
            .iter()
            .filter(|item| filter.accepts(item.category_label()))
            .collect();
        tracing::debug!(
            title = category_title,
            total = items.len(),
            matched = matched.len(),
            "Partitioned products by category"
        );
        matched
    }
}

/// [`CategoryMatcher::belongs_to_category`] with the built-in synonym table
pub fn belongs_to_category(product: &Product, category_title: &str) -> bool {
    CategoryMatcher::default().belongs_to_category(product, category_title)
}

/// Products of `category` with the built-in synonym table, in input order
pub fn products_in_category<'p>(products: &'p [Product], category: &Category) -> Vec<&'p Product> {
    CategoryMatcher::default().partition(products, &category.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synonyms::Resolution;
    use rust_decimal::Decimal;

    fn product(name: &str, category: &str) -> Product {
        Product {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            price: Decimal::new(199, 2),
            original_price: None,
            image: String::new(),
            quantity: "1 pc".to_string(),
            category: category.to_string(),
        }
    }

    fn matches(label: &str, title: &str) -> bool {
        CategoryMatcher::default().belongs_to_category(label, title)
    }

    #[test]
    fn test_empty_guard() {
        assert!(!belongs_to_category(&product("Carrot", ""), "Vegetables"));
        assert!(!belongs_to_category(&product("Carrot", "Carrot"), ""));
    }

    #[test]
    fn test_title_normalizing_to_empty_takes_first_entry() {
        // "&&&" passes the empty guard, normalizes to "" and "" is inside every key
        let table = SynonymTable::builtin();
        let resolution = table.resolve("");
        assert!(matches!(resolution, Resolution::Fuzzy(_)));
        assert_eq!(resolution.key(), Some("vegetables"));

        assert!(matches("Vegetable", "&&&"));
        assert!(matches("Verduras", "&&&"));
        assert!(!matches("Carrot", "&&&"));
        assert!(!matches("Bakery", "&&&"));
    }

    #[test]
    fn test_label_normalizing_to_empty_matches_everything() {
        assert!(matches("!!", "Bakery"));
        assert!(matches("!!", "Milk & Juice"));
        assert!(matches("  ", "Xyzzy"));
        assert!(!matches("", "Bakery"));
    }

    #[test]
    fn test_direct_mapping() {
        assert!(matches("Vegetables", "Vegetables"));
        assert!(matches("verdura", "Verduras"));
        assert!(matches("Frutas", "Fruits"));
        assert!(matches("Cereal", "Granos"));
    }

    #[test]
    fn test_compound_category() {
        assert!(matches("Beverages", "Milk & Juice"));
        assert!(matches("Dairy", "Milk & Juice"));
        assert!(matches("Leche", "Milk & Juice"));
        assert!(matches("Eggs", "Chicken & Egg"));
        assert!(matches("Carnes", "Carnes & Huevo"));
    }

    #[test]
    fn test_fallback_self_match() {
        assert!(matches("Xyzzy", "Xyzzy"));
        assert!(!matches("Abc", "Xyzzy"));
    }

    #[test]
    fn test_no_leakage_between_disjoint_categories() {
        assert!(!matches("Bread", "Fruits"));
        assert!(!matches("Beverages", "Vegetables"));
        assert!(!matches("Shampoo", "Bakery"));
    }

    #[test]
    fn test_product_label_inside_synonym() {
        // "veg" is contained in "vegetables"
        assert!(matches("Veg", "Vegetables"));
    }

    #[test]
    fn test_short_synonym_false_positive_is_kept() {
        // "pan" is a bakery synonym and a substring of "japanese"
        assert!(matches("Japanese Sauces", "Bakery"));
    }

    #[test]
    fn test_custom_table() {
        let table = SynonymTable::new(vec![("frozen", vec!["frozen", "congelados", "icecream"])])
            .unwrap();
        let matcher = CategoryMatcher::new(Arc::new(table));
        assert!(matcher.belongs_to_category("Congelados", "Frozen"));
        assert!(matcher.belongs_to_category("Ice Cream", "Frozen"));
        assert!(!matcher.belongs_to_category("Vegetables", "Frozen"));
    }

    #[test]
    fn test_filter_exposes_normalized_synonyms() {
        let filter = CategoryMatcher::default().filter("Bakery").unwrap();
        assert_eq!(
            filter.synonyms(),
            &["bakery", "bread", "baked", "panaderia", "pan"]
        );
        assert!(CategoryMatcher::default().filter("").is_none());
    }

    #[test]
    fn test_partition_keeps_input_order_and_is_repeatable() {
        let products = vec![
            product("Green Bell Pepper 500g", "Vegetables"),
            product("Mango Maaza Juice", "Beverages"),
            product("Fresh Coriander Bunch", "Vegetables"),
        ];
        let category = Category {
            id: "1".into(),
            title: "Vegetables".into(),
            icon: "/images/vegetables-icon.png".into(),
            slug: "vegetables".into(),
        };

        let first = products_in_category(&products, &category);
        let names: Vec<&str> = first.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Green Bell Pepper 500g", "Fresh Coriander Bunch"]);

        let second = products_in_category(&products, &category);
        assert_eq!(first, second);
    }

    #[test]
    fn test_partition_with_empty_title_is_empty() {
        let products = vec![product("Milk", "Dairy")];
        assert!(CategoryMatcher::default().partition(&products, "").is_empty());
    }

    #[test]
    fn test_matcher_is_shareable_across_threads() {
        let matcher = CategoryMatcher::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let matcher = matcher.clone();
                std::thread::spawn(move || matcher.belongs_to_category("Dairy", "Milk & Juice"))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
