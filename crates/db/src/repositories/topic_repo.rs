//! Repository for the `topics` table.

use sqlx::PgPool;

use campus_core::types::{DbId, Timestamp};

use crate::models::topic::{CreateTopic, Topic, TopicListItem, TopicPatch, TopicSort};

/// Column list for `topics` queries.
const COLUMNS: &str = "id, category_id, author_id, title, slug, content, preview, \
     is_question, is_solved, is_locked, is_hidden, is_pinned, wiki_mode, \
     view_count, last_activity_at, created_at";

/// Filters for a paginated topic listing.
#[derive(Debug, Default)]
pub struct TopicListFilter {
    /// Keyset cursor: only topics with strictly earlier activity are returned.
    pub cursor: Option<Timestamp>,
    /// Restrict to a category by slug.
    pub category: Option<String>,
    /// Restrict to topics carrying a tag by slug.
    pub tag: Option<String>,
    /// Requested ordering.
    pub sort: TopicSort,
    /// Page size; the query fetches one extra row to answer has-more.
    pub limit: i64,
}

/// Provides CRUD and listing operations for topics.
pub struct TopicRepo;

impl TopicRepo {
    /// Create a topic. Slug and preview are precomputed by the caller so the
    /// insert is a single statement with no existence check.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreateTopic,
        slug: &str,
        preview: &str,
    ) -> Result<Topic, sqlx::Error> {
        let query = format!(
            "INSERT INTO topics (category_id, author_id, title, slug, content, preview, \
                 is_question, wiki_mode) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(input.category_id)
            .bind(author_id)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.content)
            .bind(preview)
            .bind(input.is_question)
            .bind(input.wiki_mode)
            .fetch_one(pool)
            .await
    }

    /// Find a topic by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = $1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a topic by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE slug = $1");
        sqlx::query_as::<_, Topic>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a path segment that may be either a numeric id or a slug.
    pub async fn find_by_id_or_slug(
        pool: &PgPool,
        id_or_slug: &str,
    ) -> Result<Option<Topic>, sqlx::Error> {
        if let Ok(id) = id_or_slug.parse::<DbId>() {
            if let Some(topic) = Self::find_by_id(pool, id).await? {
                return Ok(Some(topic));
            }
        }
        Self::find_by_slug(pool, id_or_slug).await
    }

    /// List topics with keyset pagination on `last_activity_at`.
    ///
    /// Fetches `limit + 1` rows; the caller pops the extra row to decide
    /// whether another page exists without a separate count query. Hidden
    /// topics are excluded.
    pub async fn list(
        pool: &PgPool,
        filter: &TopicListFilter,
    ) -> Result<Vec<TopicListItem>, sqlx::Error> {
        let order = match filter.sort {
            TopicSort::Latest => "t.last_activity_at DESC, t.id DESC",
            TopicSort::Popular => "t.view_count DESC, t.last_activity_at DESC, t.id DESC",
            TopicSort::Unanswered => {
                "(t.is_question AND NOT t.is_solved) DESC, t.last_activity_at DESC, t.id DESC"
            }
        };
        let query = format!(
            "SELECT t.id, t.category_id, t.author_id, t.title, t.slug, t.preview, \
                    t.is_question, t.is_solved, t.is_locked, t.is_pinned, t.wiki_mode, \
                    t.view_count, t.last_activity_at, t.created_at, \
                    u.username AS author_name, c.name AS category_name, c.slug AS category_slug \
             FROM topics t \
             JOIN users u ON u.id = t.author_id \
             JOIN categories c ON c.id = t.category_id \
             WHERE NOT t.is_hidden \
               AND ($1::timestamptz IS NULL OR t.last_activity_at < $1) \
               AND ($2::text IS NULL OR c.slug = $2) \
               AND ($3::text IS NULL OR EXISTS ( \
                       SELECT 1 FROM topic_tags tt \
                       JOIN tags tg ON tg.id = tt.tag_id \
                       WHERE tt.topic_id = t.id AND tg.slug = $3)) \
             ORDER BY {order} \
             LIMIT $4"
        );
        sqlx::query_as::<_, TopicListItem>(&query)
            .bind(filter.cursor)
            .bind(filter.category.as_deref())
            .bind(filter.tag.as_deref())
            .bind(filter.limit + 1)
            .fetch_all(pool)
            .await
    }

    /// Apply a patch, regenerating nothing the caller did not supply.
    ///
    /// `preview` accompanies a content change and is `None` otherwise.
    /// Returns the updated row, or `None` if the topic does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &TopicPatch,
        preview: Option<&str>,
    ) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!(
            "UPDATE topics SET \
                 title = COALESCE($2, title), \
                 content = COALESCE($3, content), \
                 preview = COALESCE($4, preview), \
                 is_locked = COALESCE($5, is_locked), \
                 is_hidden = COALESCE($6, is_hidden), \
                 is_pinned = COALESCE($7, is_pinned), \
                 wiki_mode = COALESCE($8, wiki_mode) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.content.as_deref())
            .bind(preview)
            .bind(patch.is_locked)
            .bind(patch.is_hidden)
            .bind(patch.is_pinned)
            .bind(patch.wiki_mode)
            .fetch_optional(pool)
            .await
    }

    /// Bump the activity timestamp to now. Concurrent writers race
    /// last-write-wins; both are setting "now", so ordering stays sane.
    pub async fn touch_activity(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE topics SET last_activity_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Increment the view counter. Issued off the read path's critical
    /// section; failures are the caller's to swallow.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE topics SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Count topics the author created at or after `since` (rate limiting).
    pub async fn count_recent_by_author(
        pool: &PgPool,
        author_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM topics WHERE author_id = $1 AND created_at >= $2",
        )
        .bind(author_id)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Delete a topic and every dependent row.
    ///
    /// Posts, tag links, mentions, notifications, and wiki history cascade
    /// via foreign keys; reactions target polymorphically and are removed
    /// explicitly in the same transaction so no orphans survive.
    ///
    /// Returns `true` if the topic existed and was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM reactions \
             WHERE (target_type = 'topic' AND target_id = $1) \
                OR (target_type = 'post' AND target_id IN \
                       (SELECT id FROM posts WHERE topic_id = $1))",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM topics WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
