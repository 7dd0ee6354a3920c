//! View Projector for LearnHub.
//!
//! Pure functions deriving what the dashboard shows from the collection
//! store's contents. Order is always the store's order; nothing is re-sorted.

use crate::types::bookmark::{Bookmark, Category, CategoryId};

/// Bookmarks visible under the given category filter.
///
/// With no filter every bookmark is visible. With a filter only bookmarks
/// whose category reference equals it are; uncategorized bookmarks never
/// appear under a category.
pub fn project(bookmarks: &[Bookmark], category: Option<CategoryId>) -> Vec<&Bookmark> {
    match category {
        None => bookmarks.iter().collect(),
        Some(id) => bookmarks
            .iter()
            .filter(|b| b.category_id() == Some(id))
            .collect(),
    }
}

/// Number of bookmarks referencing `category`.
pub fn count_in_category(bookmarks: &[Bookmark], category: CategoryId) -> usize {
    bookmarks
        .iter()
        .filter(|b| b.category_id() == Some(category))
        .count()
}

/// One row of the category sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    /// `None` for the "all bookmarks" row.
    pub category: Option<CategoryId>,
    pub label: String,
    pub count: usize,
    pub active: bool,
}

/// Builds the sidebar: an "all" row followed by one row per category.
///
/// Counts are taken from `all_bookmarks`, the full collection, so they do not
/// change while search results are on screen.
pub fn sidebar(
    all_bookmarks: &[Bookmark],
    categories: &[Category],
    active: Option<CategoryId>,
) -> Vec<SidebarEntry> {
    let mut entries = Vec::with_capacity(categories.len() + 1);
    entries.push(SidebarEntry {
        category: None,
        label: "All Bookmarks".to_string(),
        count: all_bookmarks.len(),
        active: active.is_none(),
    });
    entries.extend(categories.iter().map(|c| SidebarEntry {
        category: Some(c.id),
        label: c.name.clone(),
        count: count_in_category(all_bookmarks, c.id),
        active: active == Some(c.id),
    }));
    entries
}
