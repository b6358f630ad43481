//! Category slug derivation

use regex::Regex;
use std::sync::LazyLock;

static AMPERSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+&\s+").expect("valid ampersand pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("valid slug charset pattern"));

/// Derive the URL slug of a category title.
///
/// `"Milk & Juice"` becomes `"milk-juice"`, `"Personal Care"` becomes
/// `"personal-care"`.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let joined = AMPERSAND.replace_all(&lower, "-");
    let dashed = WHITESPACE.replace_all(&joined, "-");
    DISALLOWED.replace_all(&dashed, "").into_owned()
}
