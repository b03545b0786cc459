//! Repository for the append-only `wiki_edits` history.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::wiki_edit::WikiEdit;

/// Column list for `wiki_edits` queries.
const COLUMNS: &str =
    "id, topic_id, editor_id, previous_content, new_content, edit_summary, created_at";

/// Provides append and history-listing operations for wiki edits.
pub struct WikiEditRepo;

impl WikiEditRepo {
    /// Apply a collaborative content replacement.
    ///
    /// Reads the topic's current content under a row lock, writes the
    /// history record first, then updates the topic's content and preview —
    /// all in one transaction, so every surviving content version has a
    /// matching history row whose `previous_content` is exactly what the
    /// edit replaced.
    ///
    /// Returns the history row, or `None` if the topic does not exist.
    pub async fn append(
        pool: &PgPool,
        topic_id: DbId,
        editor_id: DbId,
        new_content: &str,
        new_preview: &str,
        edit_summary: Option<&str>,
    ) -> Result<Option<WikiEdit>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT content FROM topics WHERE id = $1 FOR UPDATE")
                .bind(topic_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(previous) = previous else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO wiki_edits (topic_id, editor_id, previous_content, new_content, edit_summary) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let edit = sqlx::query_as::<_, WikiEdit>(&query)
            .bind(topic_id)
            .bind(editor_id)
            .bind(&previous)
            .bind(new_content)
            .bind(edit_summary)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE topics SET content = $2, preview = $3 WHERE id = $1")
            .bind(topic_id)
            .bind(new_content)
            .bind(new_preview)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(edit))
    }

    /// List a topic's edit history, newest first.
    pub async fn list_for_topic(
        pool: &PgPool,
        topic_id: DbId,
        limit: i64,
    ) -> Result<Vec<WikiEdit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wiki_edits \
             WHERE topic_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, WikiEdit>(&query)
            .bind(topic_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
