//! Category label normalization

/// Normalize a category label for comparison.
///
/// Lowercases the input and drops every character outside `a-z` / `0-9`, so
/// spaces, punctuation, ampersands and accented letters all disappear:
/// `"Milk & Juice"` becomes `"milkjuice"` and `"Lácteos"` becomes `"lcteos"`.
/// Total and idempotent.
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
