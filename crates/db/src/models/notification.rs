//! Notification entity models and DTOs.

use serde::Serialize;
use sqlx::FromRow;

use campus_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub topic_id: Option<DbId>,
    pub post_id: Option<DbId>,
    pub actor_id: Option<DbId>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Parameters for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub kind: &'static str,
    pub topic_id: Option<DbId>,
    pub post_id: Option<DbId>,
    pub actor_id: Option<DbId>,
    pub title: String,
    pub message: String,
}
