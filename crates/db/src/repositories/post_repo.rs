//! Repository for the `posts` table, including the solution workflow.

use sqlx::PgPool;

use campus_core::types::{DbId, Timestamp};

use crate::models::post::{CreatePost, Post, PostWithAuthor};

/// Column list for `posts` queries.
const COLUMNS: &str =
    "id, topic_id, author_id, parent_id, content, is_solution, is_hidden, created_at";

/// Provides CRUD and solution-workflow operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Create a post and bump the topic's activity timestamp in one
    /// transaction, keeping pagination cursors monotonic per topic.
    pub async fn create(
        pool: &PgPool,
        topic_id: DbId,
        author_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO posts (topic_id, author_id, parent_id, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(topic_id)
            .bind(author_id)
            .bind(input.parent_id)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE topics SET last_activity_at = NOW() WHERE id = $1")
            .bind(topic_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(post)
    }

    /// Find a post by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a topic's visible posts in creation order, with author name and
    /// progression level resolved in the same query.
    pub async fn list_by_topic(
        pool: &PgPool,
        topic_id: DbId,
    ) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, PostWithAuthor>(
            "SELECT p.id, p.topic_id, p.author_id, p.parent_id, p.content, \
                    p.is_solution, p.is_hidden, p.created_at, \
                    u.username AS author_name, COALESCE(ul.level, 0) AS author_level \
             FROM posts p \
             JOIN users u ON u.id = p.author_id \
             LEFT JOIN user_levels ul ON ul.user_id = p.author_id \
             WHERE p.topic_id = $1 AND NOT p.is_hidden \
             ORDER BY p.created_at, p.id",
        )
        .bind(topic_id)
        .fetch_all(pool)
        .await
    }

    /// Count posts the author created at or after `since` (rate limiting).
    pub async fn count_recent_by_author(
        pool: &PgPool,
        author_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE author_id = $1 AND created_at >= $2",
        )
        .bind(author_id)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Mark a post as the topic's accepted solution.
    ///
    /// Clears any previously marked post, marks the target, and sets the
    /// topic's `is_solved` — all in one transaction, so at most one post per
    /// topic ever holds the flag.
    ///
    /// Returns the updated post, or `None` if it does not belong to the topic.
    pub async fn mark_solution(
        pool: &PgPool,
        topic_id: DbId,
        post_id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE posts SET is_solution = FALSE \
             WHERE topic_id = $1 AND is_solution AND id <> $2",
        )
        .bind(topic_id)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE posts SET is_solution = TRUE \
             WHERE id = $1 AND topic_id = $2 \
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .bind(topic_id)
            .fetch_optional(&mut *tx)
            .await?;

        if post.is_none() {
            // Target post is not part of this topic; leave everything as-is.
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("UPDATE topics SET is_solved = TRUE WHERE id = $1")
            .bind(topic_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(post)
    }

    /// Clear a post's solution flag and the topic's `is_solved` together.
    ///
    /// Returns the updated post, or `None` if it does not belong to the topic.
    pub async fn unmark_solution(
        pool: &PgPool,
        topic_id: DbId,
        post_id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE posts SET is_solution = FALSE \
             WHERE id = $1 AND topic_id = $2 \
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .bind(topic_id)
            .fetch_optional(&mut *tx)
            .await?;

        if post.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("UPDATE topics SET is_solved = FALSE WHERE id = $1")
            .bind(topic_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(post)
    }

    /// Delete a post.
    ///
    /// If the post was the topic's accepted solution, the topic reverts to
    /// unsolved in the same transaction (is_solved must mirror exactly one
    /// live solution post).
    ///
    /// Returns `true` if the post existed and was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted: Option<(DbId, bool)> = sqlx::query_as(
            "DELETE FROM posts WHERE id = $1 RETURNING topic_id, is_solution",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((topic_id, was_solution)) = deleted else {
            tx.rollback().await?;
            return Ok(false);
        };

        if was_solution {
            sqlx::query("UPDATE topics SET is_solved = FALSE WHERE id = $1")
                .bind(topic_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
