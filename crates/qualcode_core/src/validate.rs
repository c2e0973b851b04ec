//! Input normalization shared by the mutation API and configuration.
//!
//! # Invariants
//! - Colors are `#rgb` or `#rrggbb` hex, stored lowercase.
//! - Tags are trimmed, lowercased, deduplicated and sorted.

use once_cell::sync::Lazy;
use std::collections::BTreeSet;

static HEX_COLOR_RE: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Returns whether `value` is a `#rgb` or `#rrggbb` hex color.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Trims and lowercases a hex color, or returns `None` when malformed.
pub fn normalize_color(value: &str) -> Option<String> {
    let trimmed = value.trim();
    is_hex_color(trimmed).then(|| trimmed.to_ascii_lowercase())
}

/// Trims a display name, or returns `None` when blank.
pub fn normalize_name(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Normalizes one tag. Blank tags yield `None`.
pub fn normalize_tag(value: &str) -> Option<String> {
    normalize_name(value).map(|tag| tag.to_lowercase())
}

/// Normalizes and deduplicates a tag list; blank entries are dropped.
pub fn normalize_tags(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| normalize_tag(value))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
