//! Topic entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use campus_core::types::{DbId, Timestamp};

/// A row from the `topics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Topic {
    pub id: DbId,
    pub category_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub preview: String,
    pub is_question: bool,
    pub is_solved: bool,
    pub is_locked: bool,
    pub is_hidden: bool,
    pub is_pinned: bool,
    pub wiki_mode: bool,
    pub view_count: i64,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
}

/// One entry of a paginated topic listing.
///
/// Carries the stored preview instead of the full content, plus author and
/// category names resolved in the same query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopicListItem {
    pub id: DbId,
    pub category_id: DbId,
    pub author_id: DbId,
    pub title: String,
    pub slug: String,
    pub preview: String,
    pub is_question: bool,
    pub is_solved: bool,
    pub is_locked: bool,
    pub is_pinned: bool,
    pub wiki_mode: bool,
    pub view_count: i64,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub author_name: String,
    pub category_name: String,
    pub category_slug: String,
}

/// DTO for creating a topic.
#[derive(Debug, Deserialize)]
pub struct CreateTopic {
    pub title: String,
    pub content: String,
    pub category_id: DbId,
    #[serde(default)]
    pub is_question: bool,
    #[serde(default)]
    pub wiki_mode: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for patching a topic.
///
/// `title`/`content` are author edits; the flag fields are moderation edits.
#[derive(Debug, Default, Deserialize)]
pub struct TopicPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_locked: Option<bool>,
    pub is_hidden: Option<bool>,
    pub is_pinned: Option<bool>,
    pub wiki_mode: Option<bool>,
}

impl TopicPatch {
    /// Whether the patch carries any author-editable field.
    pub fn has_content_fields(&self) -> bool {
        self.title.is_some() || self.content.is_some()
    }

    /// Whether the patch carries any moderation flag.
    pub fn has_moderation_fields(&self) -> bool {
        self.is_locked.is_some()
            || self.is_hidden.is_some()
            || self.is_pinned.is_some()
            || self.wiki_mode.is_some()
    }

    /// Whether the patch carries no recognized field at all.
    pub fn is_empty(&self) -> bool {
        !self.has_content_fields() && !self.has_moderation_fields()
    }
}

/// Sort orders for topic listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSort {
    /// Most recent activity first (the default).
    Latest,
    /// Highest view count first.
    Popular,
    /// Unsolved questions first, then latest activity.
    Unanswered,
}

impl TopicSort {
    /// Parse the query-string form; `None` for unknown sorts.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "latest" => Some(TopicSort::Latest),
            "popular" => Some(TopicSort::Popular),
            "unanswered" => Some(TopicSort::Unanswered),
            _ => None,
        }
    }
}

impl Default for TopicSort {
    fn default() -> Self {
        TopicSort::Latest
    }
}
