//! Mention entity model.

use serde::Serialize;
use sqlx::FromRow;

use campus_core::types::{DbId, Timestamp};

/// A row from the `mentions` table.
///
/// Unique per `(post_id, mentioned_user_id)`; inserts are
/// conflict-as-ignore so re-processing a post is idempotent.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Mention {
    pub id: DbId,
    pub post_id: DbId,
    pub mentioned_user_id: DbId,
    pub mentioning_user_id: DbId,
    pub created_at: Timestamp,
}
