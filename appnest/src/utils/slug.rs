//! Business-domain slug normalization.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Normalizes a business-domain name into a slug.
///
/// Lowercases the input, collapses whitespace runs into single underscores,
/// and strips every character outside `[a-z0-9_]`. The transform is
/// idempotent: applying it twice yields the same string as applying it once.
///
/// # Examples
///
/// ```
/// use appnest::utils::domain_slug;
///
/// assert_eq!(domain_slug("Gestion des Fournisseurs"), "gestion_des_fournisseurs");
/// assert_eq!(domain_slug("gestion_des_fournisseurs"), "gestion_des_fournisseurs");
/// ```
#[must_use]
pub fn domain_slug(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let underscored = whitespace_pattern().replace_all(&lowered, "_");
    underscored
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}
