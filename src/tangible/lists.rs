//! List item helpers: cleaning model-produced lines, keeping stable item ids
//! across reorderings, and applying suggested list modifications.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named group of items produced by `expect_groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub name: String,
    pub items: Vec<String>,
}

// =============================================================================
// TEXT CLEANUP
// =============================================================================

/// Strip leading list markers (`"1. "`, `"- "`), repeatedly.
#[must_use]
pub fn without_prefix(text: &str) -> &str {
    let mut rest = text;
    while let Some(stripped) = strip_marker(rest) {
        rest = stripped;
    }
    rest
}

fn strip_marker(text: &str) -> Option<&str> {
    let after = match text.strip_prefix('-') {
        Some(after) => after,
        None => {
            let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                return None;
            }
            text[digits..].strip_prefix('.')?
        }
    };
    let trimmed = after.trim_start();
    (trimmed.len() < after.len()).then_some(trimmed)
}

/// Strip trailing periods.
#[must_use]
pub fn without_trailing_dot(text: &str) -> &str {
    text.trim_end_matches('.')
}

// =============================================================================
// IDENTIFIED ITEMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListItemId(pub Uuid);

/// Source of fresh item and list ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ListItemId,
    pub text: String,
}

impl ListItem {
    pub fn new(text: impl Into<String>, ids: &dyn IdGenerator) -> Self {
        Self { id: ListItemId(ids.next_id()), text: text.into() }
    }

    /// Fresh items for each text, in order.
    pub fn from_texts<S: AsRef<str>>(texts: &[S], ids: &dyn IdGenerator) -> Vec<Self> {
        texts.iter().map(|t| Self::new(t.as_ref(), ids)).collect()
    }
}

/// A named list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: Uuid,
    pub name: String,
    pub items: Vec<ListItem>,
}

/// Reorder `items` to follow `sorted`, keeping each item's id.
///
/// Each sorted text consumes the first not-yet-used item with equal text.
/// Texts with no such item are dropped, as are items never named.
#[must_use]
pub fn to_sorted_list_items<S: AsRef<str>>(sorted: &[S], items: &[ListItem]) -> Vec<ListItem> {
    let mut remaining: Vec<&ListItem> = items.iter().collect();
    sorted
        .iter()
        .filter_map(|text| {
            let pos = remaining
                .iter()
                .position(|item| item.text == text.as_ref())?;
            Some(remaining.remove(pos).clone())
        })
        .collect()
}

/// Keep the items whose text appears in `kept`, in original order.
#[must_use]
pub fn to_filtered_list_items<S: AsRef<str>>(kept: &[S], items: &[ListItem]) -> Vec<ListItem> {
    items
        .iter()
        .filter(|item| kept.iter().any(|k| k.as_ref() == item.text))
        .cloned()
        .collect()
}

// =============================================================================
// SUGGESTED MODIFICATIONS
// =============================================================================

/// A model-suggested change to a list, pending user acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestedListModification {
    Filtered { predicate: String, items: Vec<String> },
    Sorted { order_by: Option<String>, items: Vec<String> },
    Grouped { criteria: Option<String>, groups: Vec<ItemGroup> },
}

/// Outcome of applying a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AppliedModification {
    /// The list's items, filtered or reordered with ids kept.
    Items(Vec<ListItem>),
    /// One new list per group, with fresh ids.
    Lists(Vec<List>),
}

impl SuggestedListModification {
    pub fn apply(&self, items: &[ListItem], ids: &dyn IdGenerator) -> AppliedModification {
        match self {
            Self::Filtered { items: kept, .. } => AppliedModification::Items(to_filtered_list_items(kept, items)),
            Self::Sorted { items: sorted, .. } => AppliedModification::Items(to_sorted_list_items(sorted, items)),
            Self::Grouped { groups, .. } => AppliedModification::Lists(
                groups
                    .iter()
                    .map(|group| List {
                        id: ids.next_id(),
                        name: group.name.clone(),
                        items: group
                            .items
                            .iter()
                            .map(|text| ListItem::new(without_trailing_dot(text), ids))
                            .collect(),
                    })
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "lists_test.rs"]
mod tests;
