//! Forum field validation and notification kinds.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum topic/post title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Maximum number of tags attachable to one topic.
pub const MAX_TAGS_PER_TOPIC: usize = 5;

/// Maximum length of a single tag name.
pub const MAX_TAG_LENGTH: usize = 50;

/// Maximum length of a wiki edit summary.
pub const MAX_EDIT_SUMMARY_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a topic title (non-empty, bounded).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate topic or post content (non-empty, bounded).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Content must not be empty".into()));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a tag list (bounded count, each tag non-empty and bounded).
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > MAX_TAGS_PER_TOPIC {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_TAGS_PER_TOPIC} tags is allowed"
        )));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".into()));
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "Each tag must be at most {MAX_TAG_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Validate an optional wiki edit summary (bounded).
pub fn validate_edit_summary(summary: &str) -> Result<(), CoreError> {
    if summary.chars().count() > MAX_EDIT_SUMMARY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Edit summary must be at most {MAX_EDIT_SUMMARY_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Notification kinds
// ---------------------------------------------------------------------------

/// The kinds of notifications the engine produces.
///
/// `Achievement` rows are written by the external progression subsystem;
/// the enum carries the kind so recipients see a uniform feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Mention,
    Reply,
    Reaction,
    Solution,
    WikiEdit,
    Achievement,
}

impl NotificationKind {
    /// Stable string form used in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Mention => "mention",
            NotificationKind::Reply => "reply",
            NotificationKind::Reaction => "reaction",
            NotificationKind::Solution => "solution",
            NotificationKind::WikiEdit => "wiki_edit",
            NotificationKind::Achievement => "achievement",
        }
    }

    /// Parse the stable string form; `None` for unknown kinds.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mention" => Some(NotificationKind::Mention),
            "reply" => Some(NotificationKind::Reply),
            "reaction" => Some(NotificationKind::Reaction),
            "solution" => Some(NotificationKind::Solution),
            "wiki_edit" => Some(NotificationKind::WikiEdit),
            "achievement" => Some(NotificationKind::Achievement),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
