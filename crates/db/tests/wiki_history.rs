//! Integration tests for the append-only wiki edit history.

mod common;

use sqlx::PgPool;

use campus_core::slug;
use campus_db::repositories::{TopicRepo, WikiEditRepo};
use common::*;

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_captures_previous_content_and_updates_topic(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let editor = seed_user(&pool, "ivan", "member").await;
    let cat = category_id(&pool, "general").await;
    let topic = create_topic(&pool, author, &new_topic("Wiki page", cat)).await;

    let new_content = "rewritten body";
    let edit = WikiEditRepo::append(
        &pool,
        topic.id,
        editor,
        new_content,
        &slug::preview(new_content),
        Some("clarified wording"),
    )
    .await
    .unwrap()
    .expect("topic exists");

    assert_eq!(edit.previous_content, topic.content);
    assert_eq!(edit.new_content, new_content);
    assert_eq!(edit.edit_summary.as_deref(), Some("clarified wording"));

    let topic_after = TopicRepo::find_by_id(&pool, topic.id).await.unwrap().unwrap();
    assert_eq!(topic_after.content, new_content);
    assert_eq!(topic_after.preview, "rewritten body");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn successive_edits_chain_their_previous_contents(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let editor = seed_user(&pool, "ivan", "member").await;
    let cat = category_id(&pool, "general").await;
    let topic = create_topic(&pool, author, &new_topic("Chained", cat)).await;

    for i in 1..=3 {
        let content = format!("version {i}");
        WikiEditRepo::append(&pool, topic.id, editor, &content, &slug::preview(&content), None)
            .await
            .unwrap()
            .unwrap();
    }

    // History is newest-first; each row's previous is the prior row's new.
    let history = WikiEditRepo::list_for_topic(&pool, topic.id, 10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].new_content, "version 3");
    assert_eq!(history[0].previous_content, "version 2");
    assert_eq!(history[1].previous_content, "version 1");
    assert_eq!(history[2].previous_content, topic.content);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_on_missing_topic_writes_nothing(pool: PgPool) {
    let editor = seed_user(&pool, "ivan", "member").await;

    let result = WikiEditRepo::append(&pool, 424242, editor, "body", "body", None)
        .await
        .unwrap();
    assert!(result.is_none());

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wiki_edits")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_limit_is_honored(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    let editor = seed_user(&pool, "ivan", "member").await;
    let cat = category_id(&pool, "general").await;
    let topic = create_topic(&pool, author, &new_topic("Long history", cat)).await;

    for i in 0..5 {
        let content = format!("rev {i}");
        WikiEditRepo::append(&pool, topic.id, editor, &content, &content, None)
            .await
            .unwrap()
            .unwrap();
    }

    let history = WikiEditRepo::list_for_topic(&pool, topic.id, 2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].new_content, "rev 4");
}
