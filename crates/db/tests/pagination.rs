//! Integration tests for cursor pagination over topics.
//!
//! The property under test: repeatedly following the cursor from the first
//! page until exhaustion yields the full topic set with no duplicates and
//! no gaps, ordered by decreasing `last_activity_at`.

mod common;

use std::collections::HashSet;

use sqlx::PgPool;

use campus_core::types::{DbId, Timestamp};
use campus_db::models::topic::TopicSort;
use campus_db::repositories::{TopicListFilter, TopicRepo};
use common::*;

/// Seed `n` topics with strictly increasing activity timestamps.
async fn seed_topics(pool: &PgPool, author: DbId, cat: DbId, n: usize) -> Vec<DbId> {
    let mut ids = Vec::new();
    for i in 0..n {
        let topic = create_topic(pool, author, &new_topic(&format!("Topic {i}"), cat)).await;
        // Distinct activity instants make the strict-inequality cursor exact.
        sqlx::query("UPDATE topics SET last_activity_at = NOW() + ($2 || ' milliseconds')::interval WHERE id = $1")
            .bind(topic.id)
            .bind((i as i64 * 10).to_string())
            .execute(pool)
            .await
            .unwrap();
        ids.push(topic.id);
    }
    ids
}

/// Walk every page of a listing, asserting page-size bounds along the way.
async fn collect_all_pages(
    pool: &PgPool,
    sort: TopicSort,
    limit: i64,
) -> Vec<(DbId, Timestamp)> {
    let mut seen = Vec::new();
    let mut cursor: Option<Timestamp> = None;

    loop {
        let filter = TopicListFilter {
            cursor,
            category: None,
            tag: None,
            sort,
            limit,
        };
        let mut rows = TopicRepo::list(pool, &filter).await.unwrap();
        let has_more = rows.len() as i64 > limit;
        if has_more {
            rows.truncate(limit as usize);
        }
        assert!(rows.len() as i64 <= limit);

        let last_activity = rows.last().map(|t| t.last_activity_at);
        seen.extend(rows.into_iter().map(|t| (t.id, t.last_activity_at)));

        if !has_more {
            break;
        }
        cursor = last_activity;
    }

    seen
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cursor_walk_is_exhaustive_and_non_overlapping(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let cat = category_id(&pool, "general").await;
    let ids = seed_topics(&pool, author, cat, 23).await;

    let seen = collect_all_pages(&pool, TopicSort::Latest, 5).await;

    // No duplicates, no gaps.
    let unique: HashSet<DbId> = seen.iter().map(|(id, _)| *id).collect();
    assert_eq!(unique.len(), seen.len(), "no topic may appear twice");
    assert_eq!(unique, ids.into_iter().collect::<HashSet<_>>());

    // Strictly decreasing activity order.
    for pair in seen.windows(2) {
        assert!(pair[0].1 > pair[1].1, "activity must strictly decrease");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn single_page_has_no_next_cursor_signal(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let cat = category_id(&pool, "general").await;
    seed_topics(&pool, author, cat, 3).await;

    let filter = TopicListFilter {
        cursor: None,
        category: None,
        tag: None,
        sort: TopicSort::Latest,
        limit: 10,
    };
    let rows = TopicRepo::list(&pool, &filter).await.unwrap();

    // Fewer than limit + 1 rows means the caller sees no further page.
    assert_eq!(rows.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_filter_restricts_results(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let general = category_id(&pool, "general").await;
    let questions = category_id(&pool, "questions").await;

    create_topic(&pool, author, &new_topic("In general", general)).await;
    create_topic(&pool, author, &new_topic("In questions", questions)).await;

    let filter = TopicListFilter {
        cursor: None,
        category: Some("questions".to_string()),
        tag: None,
        sort: TopicSort::Latest,
        limit: 10,
    };
    let rows = TopicRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_slug, "questions");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hidden_topics_are_excluded(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let cat = category_id(&pool, "general").await;
    let topic = create_topic(&pool, author, &new_topic("Ghost", cat)).await;

    sqlx::query("UPDATE topics SET is_hidden = TRUE WHERE id = $1")
        .bind(topic.id)
        .execute(&pool)
        .await
        .unwrap();

    let filter = TopicListFilter {
        cursor: None,
        category: None,
        tag: None,
        sort: TopicSort::Latest,
        limit: 10,
    };
    let rows = TopicRepo::list(&pool, &filter).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unanswered_sort_puts_open_questions_first(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let helper = seed_user(&pool, "ivan", "member").await;
    let cat = category_id(&pool, "questions").await;

    let plain = create_topic(&pool, author, &new_topic("Plain topic", cat)).await;
    let open = create_topic(&pool, author, &new_question("Open question", cat)).await;
    let solved = create_topic(&pool, author, &new_question("Solved question", cat)).await;
    let answer = campus_db::repositories::PostRepo::create(
        &pool,
        solved.id,
        helper,
        &new_post("answer"),
    )
    .await
    .unwrap();
    campus_db::repositories::PostRepo::mark_solution(&pool, solved.id, answer.id)
        .await
        .unwrap();

    let filter = TopicListFilter {
        cursor: None,
        category: None,
        tag: None,
        sort: TopicSort::Unanswered,
        limit: 10,
    };
    let rows = TopicRepo::list(&pool, &filter).await.unwrap();

    assert_eq!(rows[0].id, open.id, "open question leads");
    let rest: HashSet<DbId> = rows[1..].iter().map(|t| t.id).collect();
    assert!(rest.contains(&plain.id));
    assert!(rest.contains(&solved.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn popular_sort_orders_by_view_count(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let cat = category_id(&pool, "general").await;

    let quiet = create_topic(&pool, author, &new_topic("Quiet", cat)).await;
    let busy = create_topic(&pool, author, &new_topic("Busy", cat)).await;
    for _ in 0..5 {
        TopicRepo::increment_view_count(&pool, busy.id).await.unwrap();
    }

    let filter = TopicListFilter {
        cursor: None,
        category: None,
        tag: None,
        sort: TopicSort::Popular,
        limit: 10,
    };
    let rows = TopicRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(rows[0].id, busy.id);
    assert_eq!(rows[0].view_count, 5);
    assert_eq!(rows[1].id, quiet.id);
}
