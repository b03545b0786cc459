//! Post entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use campus_core::types::{DbId, Timestamp};

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub topic_id: DbId,
    pub author_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub is_solution: bool,
    pub is_hidden: bool,
    pub created_at: Timestamp,
}

/// A post with its author's name and progression level, for topic detail
/// responses (the level feeds trust-tier display).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostWithAuthor {
    pub id: DbId,
    pub topic_id: DbId,
    pub author_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub is_solution: bool,
    pub is_hidden: bool,
    pub created_at: Timestamp,
    pub author_name: String,
    pub author_level: i32,
}

/// DTO for creating a post.
#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub content: String,
    /// Optional threading parent; accepted without tree validation.
    pub parent_id: Option<DbId>,
}
