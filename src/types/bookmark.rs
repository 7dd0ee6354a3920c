use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned bookmark identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub i64);

/// Server-assigned category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

/// Server-assigned tag identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub i64);

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A saved link with its metadata, as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkId,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl Bookmark {
    /// The id of the category this bookmark points at, if any.
    ///
    /// The referenced category may no longer exist in the store.
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category.as_ref().map(|c| c.id)
    }

    /// Title for display, falling back to `placeholder` when blank.
    pub fn display_title<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.title.trim().is_empty() {
            placeholder
        } else {
            &self.title
        }
    }

    /// First `limit` tag names plus how many were left out.
    pub fn tag_preview(&self, limit: usize) -> (Vec<&str>, usize) {
        let shown: Vec<&str> = self.tags.iter().take(limit).map(|t| t.name.as_str()).collect();
        let hidden = self.tags.len().saturating_sub(shown.len());
        (shown, hidden)
    }

    /// Tag names joined the way the edit form shows them.
    pub fn joined_tags(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Category reference embedded in a bookmark payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single-assignment grouping label for bookmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A free-text label attached to bookmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Fields sent when creating a bookmark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBookmark {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update of an existing bookmark. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub thumbnail_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub reanalyze: bool,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
