//! Diagnostic text describing a failed item.

use crate::core::LibraryItem;

/// Substituted when the item cannot be read back from the library.
pub const DETAILS_PLACEHOLDER: &str = "[error retrieving details]";

const EMPTY_FIELD: &str = "[empty]";

/// How author and narrator fields are shortened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFormat {
    /// Longest field rendered in full, in characters.
    pub max_len: usize,
    /// Suffix marking a shortened field.
    pub ellipsis: String,
}

impl Default for DetailFormat {
    fn default() -> Self {
        Self {
            max_len: 50,
            ellipsis: "...".to_string(),
        }
    }
}

/// Shortens a field to at most `format.max_len` characters.
///
/// Blank fields render as `[empty]`. Longer fields keep as many leading
/// characters as fit in front of the ellipsis.
#[must_use]
pub fn truncate_field(value: &str, format: &DetailFormat) -> String {
    if value.trim().is_empty() {
        return EMPTY_FIELD.to_string();
    }

    if value.chars().count() <= format.max_len {
        return value.to_string();
    }

    let keep = format
        .max_len
        .saturating_sub(format.ellipsis.chars().count());
    let mut truncated: String = value.chars().take(keep).collect();
    truncated.push_str(&format.ellipsis);
    truncated
}

/// Renders the item details shown to the operator and stored in skip records.
#[must_use]
pub fn render_details(item: &LibraryItem, format: &DetailFormat) -> String {
    format!(
        "  Title: {}\n  ID: {}\n  Author: {}\n  Narr: {}",
        item.title,
        item.product_id,
        truncate_field(&item.author_names, format),
        truncate_field(&item.narrator_names, format)
    )
}
