//! Affiliation keyword filter.

/// Returns true if any keyword is a case-insensitive substring of `affiliation`.
///
/// Empty keywords are ignored so a stray `""` in the list cannot match everything.
pub fn is_company_affiliation<K: AsRef<str>>(affiliation: &str, keywords: &[K]) -> bool {
    let haystack = affiliation.to_lowercase();
    keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .any(|k| haystack.contains(&k))
}
