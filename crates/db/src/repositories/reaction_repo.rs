//! Repository for the `reactions` table.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::reaction::Reaction;

/// Provides idempotent add/remove and batch-fetch operations for reactions.
pub struct ReactionRepo;

impl ReactionRepo {
    /// Add a reaction; duplicates are ignored, never surfaced as errors.
    ///
    /// Returns `true` if a row was inserted, `false` if it already existed.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        target_type: &str,
        target_id: DbId,
        kind: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO reactions (user_id, target_type, target_id, kind) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, target_type, target_id, kind) DO NOTHING",
        )
        .bind(user_id)
        .bind(target_type)
        .bind(target_id)
        .bind(kind)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a reaction. Returns `true` if a row was deleted.
    pub async fn remove(
        pool: &PgPool,
        user_id: DbId,
        target_type: &str,
        target_id: DbId,
        kind: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM reactions \
             WHERE user_id = $1 AND target_type = $2 AND target_id = $3 AND kind = $4",
        )
        .bind(user_id)
        .bind(target_type)
        .bind(target_id)
        .bind(kind)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Batch-fetch raw reaction rows for a set of targets of one type.
    ///
    /// One query covers every post in a topic; the caller partitions the
    /// rows by target id in memory.
    pub async fn list_for_targets(
        pool: &PgPool,
        target_type: &str,
        target_ids: &[DbId],
    ) -> Result<Vec<Reaction>, sqlx::Error> {
        sqlx::query_as::<_, Reaction>(
            "SELECT id, user_id, target_type, target_id, kind, created_at \
             FROM reactions \
             WHERE target_type = $1 AND target_id = ANY($2)",
        )
        .bind(target_type)
        .bind(target_ids)
        .fetch_all(pool)
        .await
    }
}
