//! Tag entity model.

use serde::Serialize;
use sqlx::FromRow;

use campus_core::types::DbId;

/// A row from the `tags` table. Tags are get-or-create by slug.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// A tag joined with the topic it is attached to, for batch lookups.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopicTag {
    pub topic_id: DbId,
    pub id: DbId,
    pub name: String,
    pub slug: String,
}
