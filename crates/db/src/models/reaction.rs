//! Reaction entity model.

use serde::Serialize;
use sqlx::FromRow;

use campus_core::types::{DbId, Timestamp};

/// Reaction target discriminator for topics.
pub const TARGET_TOPIC: &str = "topic";
/// Reaction target discriminator for posts.
pub const TARGET_POST: &str = "post";

/// All valid reaction target types.
pub const VALID_TARGET_TYPES: &[&str] = &[TARGET_TOPIC, TARGET_POST];

/// A row from the `reactions` table.
///
/// Unique per `(user_id, target_type, target_id, kind)`: a user may hold
/// several distinct kinds on one target but never the same kind twice.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reaction {
    pub id: DbId,
    pub user_id: DbId,
    pub target_type: String,
    pub target_id: DbId,
    pub kind: String,
    pub created_at: Timestamp,
}
