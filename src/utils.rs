// src/utils.rs

/// Canonical form of a listing title: lowercased and trimmed.
///
/// This is the normalization the catalog exposes (`normalizedTitle`); the
/// lexical oracle reuses it before scoring. Idempotent:
/// `normalize_title(normalize_title(s)) == normalize_title(s)`.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
