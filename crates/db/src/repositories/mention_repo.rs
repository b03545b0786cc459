//! Repository for the `mentions` table.

use sqlx::PgPool;

use campus_core::types::DbId;

/// Provides idempotent insert for mention rows.
pub struct MentionRepo;

impl MentionRepo {
    /// Record that a post mentions a user; conflicts are ignored so
    /// re-processing the same post never duplicates rows.
    ///
    /// Returns `true` if a new row was inserted.
    pub async fn insert(
        pool: &PgPool,
        post_id: DbId,
        mentioned_user_id: DbId,
        mentioning_user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO mentions (post_id, mentioned_user_id, mentioning_user_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (post_id, mentioned_user_id) DO NOTHING",
        )
        .bind(post_id)
        .bind(mentioned_user_id)
        .bind(mentioning_user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
