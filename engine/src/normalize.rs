//! Display-name normalization.
//!
//! Two derived forms of an item's display name drive the sync: a
//! comparison key used to match remote items against persisted rows, and
//! a URL-safe handle that is persisted alongside the title.

/// Normalizes a title for matching: trimmed of leading and trailing
/// whitespace, then lowercased.
///
/// The key is used only for lookups and never persisted.
pub fn comparison_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Derives a URL-safe handle from a title.
///
/// Lowercases, maps each space and underscore to a hyphen, then drops
/// every character outside `a-z`, `0-9` and `-`. Accented letters are
/// removed rather than transliterated, and separator runs map one-for-one
/// to hyphen runs (no collapsing).
pub fn derive_handle(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}
