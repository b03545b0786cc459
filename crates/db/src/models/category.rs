//! Category entity model.

use serde::Serialize;
use sqlx::FromRow;

use campus_core::types::DbId;

/// A row from the `categories` table. Immutable reference data.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub color: String,
}
