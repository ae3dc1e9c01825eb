//! Content Hasher
//!
//! Deterministic short identifiers for atomic classes and content blobs.

/// Separator between hashed fields; never appears in property names or values
const DELIMITER: char = '\u{1f}';

/// Number of hex characters kept from the digest
pub const HASH_LENGTH: usize = 7;

/// First `HASH_LENGTH` hex characters of the md5 digest of `input`
pub fn short_hash(input: &str) -> String {
    let digest = md5::compute(input.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(HASH_LENGTH);
    hex
}

/// Class name for one atomic rule.
///
/// Pure function of its inputs: the same tuple yields the same class no
/// matter which definition produced it.
pub fn atomic_class_name(
    prefix: &str,
    property: &str,
    value: &str,
    suffix: Option<&str>,
    pseudo_element: Option<&str>,
    at_rule: Option<&str>,
) -> String {
    let mut input = String::with_capacity(property.len() + value.len() + 16);
    for field in [
        property,
        value,
        suffix.unwrap_or(""),
        pseudo_element.unwrap_or(""),
        at_rule.unwrap_or(""),
    ] {
        input.push_str(field);
        input.push(DELIMITER);
    }
    format!("{}{}", prefix, short_hash(&input))
}

/// Identifier for an arbitrary serialized body (keyframes, themes, ...)
pub fn content_hash(prefix: &str, blob: &str) -> String {
    format!("{}{}", prefix, short_hash(blob))
}
