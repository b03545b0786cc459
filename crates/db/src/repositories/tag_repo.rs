//! Repository for the `tags` and `topic_tags` tables.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::tag::{Tag, TopicTag};

/// Provides get-or-create and association operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// Get or create a tag by slug in a single round-trip.
    ///
    /// On conflict the existing row is returned unchanged (the no-op update
    /// is what makes `RETURNING` yield the row).
    pub async fn get_or_create(pool: &PgPool, name: &str, slug: &str) -> Result<Tag, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, slug) VALUES ($1, $2) \
             ON CONFLICT (slug) DO UPDATE SET name = tags.name \
             RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await
    }

    /// Attach a tag to a topic; attaching twice is a no-op.
    pub async fn attach(pool: &PgPool, topic_id: DbId, tag_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO topic_tags (topic_id, tag_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(topic_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List the tags attached to one topic.
    pub async fn list_for_topic(pool: &PgPool, topic_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT tg.id, tg.name, tg.slug \
             FROM topic_tags tt \
             JOIN tags tg ON tg.id = tt.tag_id \
             WHERE tt.topic_id = $1 \
             ORDER BY tg.name",
        )
        .bind(topic_id)
        .fetch_all(pool)
        .await
    }

    /// Batch-fetch tags for a set of topics (one query for a whole page).
    pub async fn list_for_topics(
        pool: &PgPool,
        topic_ids: &[DbId],
    ) -> Result<Vec<TopicTag>, sqlx::Error> {
        sqlx::query_as::<_, TopicTag>(
            "SELECT tt.topic_id, tg.id, tg.name, tg.slug \
             FROM topic_tags tt \
             JOIN tags tg ON tg.id = tt.tag_id \
             WHERE tt.topic_id = ANY($1) \
             ORDER BY tg.name",
        )
        .bind(topic_ids)
        .fetch_all(pool)
        .await
    }
}
