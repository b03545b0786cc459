//! User entity models.
//!
//! Users and their levels are mirrors of the external identity and
//! progression subsystems; this service only reads them.

use serde::Serialize;
use sqlx::FromRow;

use campus_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
}
