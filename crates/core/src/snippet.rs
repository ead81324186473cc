// Snippet domain types
//
// These types represent snippets and tags as returned by the public API.
// Used by both the HTTP layer and the storage backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Language assigned to snippets created without one.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// A stored code snippet with its tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Snippet {
    /// Unique identifier for the snippet.
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i64,
    /// Short title shown in listings.
    #[cfg_attr(feature = "openapi", schema(example = "Flask Basic Route"))]
    pub title: String,
    /// The snippet body.
    pub code: String,
    /// Lower-cased language name (e.g. "python").
    #[cfg_attr(feature = "openapi", schema(example = "python"))]
    pub language: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Tag names attached to the snippet, in the order they were given.
    pub tags: Vec<String>,
    /// Timestamp when the snippet was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last modification.
    pub updated_at: DateTime<Utc>,
}

/// Tag with the number of snippets currently using it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TagSummary {
    pub id: i64,
    #[cfg_attr(feature = "openapi", schema(example = "utility"))]
    pub name: String,
    pub snippet_count: i64,
}

/// Already-normalized input for creating a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub code: String,
    pub language: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Partial update. `None` leaves a field untouched.
///
/// `description` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetPatch {
    pub title: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl SnippetPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.code.is_none()
            && self.language.is_none()
            && self.description.is_none()
            && self.tags.is_none()
    }

    /// Apply the patch to an in-memory snippet (does not touch timestamps).
    pub fn apply_to(self, snippet: &mut Snippet) {
        if let Some(title) = self.title {
            snippet.title = title;
        }
        if let Some(code) = self.code {
            snippet.code = code;
        }
        if let Some(language) = self.language {
            snippet.language = language;
        }
        if let Some(description) = self.description {
            snippet.description = description;
        }
        if let Some(tags) = self.tags {
            snippet.tags = tags;
        }
    }
}

/// Filters for listing snippets. Both comparisons are case-insensitive equality
/// using Unicode lower-casing, the same folding as `LOWER()` in PostgreSQL.
/// Filter values are not trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetFilter {
    pub language: Option<String>,
    pub tag: Option<String>,
}

impl SnippetFilter {
    /// Check a snippet against the filter.
    pub fn matches(&self, snippet: &Snippet) -> bool {
        if let Some(language) = &self.language {
            if snippet.language.to_lowercase() != language.to_lowercase() {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            let tag = tag.to_lowercase();
            if !snippet.tags.iter().any(|t| t.to_lowercase() == tag) {
                return false;
            }
        }
        true
    }
}

/// Normalize a tag or language name: trimmed and lower-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
