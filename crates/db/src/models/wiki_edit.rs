//! Wiki edit history models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use campus_core::types::{DbId, Timestamp};

/// A row from the `wiki_edits` table. Append-only audit trail.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WikiEdit {
    pub id: DbId,
    pub topic_id: DbId,
    pub editor_id: DbId,
    pub previous_content: String,
    pub new_content: String,
    pub edit_summary: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for submitting a collaborative content replacement.
#[derive(Debug, Deserialize)]
pub struct CreateWikiEdit {
    pub content: String,
    pub edit_summary: Option<String>,
}
