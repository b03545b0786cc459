//! Integration tests for post creation, locking, throttling, and deletion.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use common::*;

async fn reply(
    app: &axum::Router,
    token: &str,
    topic_id: i64,
    content: &str,
) -> (StatusCode, serde_json::Value) {
    request(
        app,
        Method::POST,
        &format!("/api/v1/topics/{topic_id}/posts"),
        Some(token),
        Some(json!({"content": content})),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reply_requires_authentication(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let cat = category_id(&pool, "general").await;
    let app = build_test_app(pool);

    let topic = create_topic_via_api(&app, &token_for(author, "member"), cat, "Open", false).await;
    let id = topic["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/topics/{id}/posts"),
        None,
        Some(json!({"content": "anonymous reply"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn locked_topic_rejects_replies(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let replier = seed_user(&pool, "ivan", "member").await;
    seed_level(&pool, replier, 5).await;
    let cat = category_id(&pool, "general").await;
    let app = build_test_app(pool.clone());

    let topic = create_topic_via_api(&app, &token_for(author, "member"), cat, "Locked", false).await;
    let id = topic["id"].as_i64().unwrap();
    sqlx::query("UPDATE topics SET is_locked = TRUE WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = reply(&app, &token_for(replier, "member"), id, "too late").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn novice_fourth_reply_in_window_is_rate_limited(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    // No level row: tier 1.
    let novice = seed_user(&pool, "newbie", "member").await;
    let cat = category_id(&pool, "general").await;
    let app = build_test_app(pool.clone());
    let token = token_for(novice, "member");

    let topic = create_topic_via_api(&app, &token_for(author, "member"), cat, "Busy", false).await;
    let id = topic["id"].as_i64().unwrap();

    for i in 0..3 {
        let (status, _) = reply(&app, &token, id, &format!("reply {i}")).await;
        assert_eq!(status, StatusCode::CREATED, "reply {i} should be allowed");
    }

    let (status, body) = reply(&app, &token, id, "one too many").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMITED");

    // After the window passes, posting resumes.
    sqlx::query("UPDATE posts SET created_at = NOW() - INTERVAL '2 hours'")
        .execute(&pool)
        .await
        .unwrap();
    let (status, _) = reply(&app, &token, id, "fresh window").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trusted_user_posts_without_limit(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let trusted = seed_user(&pool, "veteran", "member").await;
    seed_level(&pool, trusted, 8).await;
    let cat = category_id(&pool, "general").await;
    let app = build_test_app(pool);
    let token = token_for(trusted, "member");

    let topic = create_topic_via_api(&app, &token_for(author, "member"), cat, "Flood", false).await;
    let id = topic["id"].as_i64().unwrap();

    for i in 0..5 {
        let (status, _) = reply(&app, &token, id, &format!("reply {i}")).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn threaded_reply_accepts_existing_parent(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let cat = category_id(&pool, "general").await;
    let app = build_test_app(pool);
    let token = token_for(author, "member");

    let topic = create_topic_via_api(&app, &token, cat, "Threaded", false).await;
    let id = topic["id"].as_i64().unwrap();

    let (status, body) = reply(&app, &token, id, "root reply").await;
    assert_eq!(status, StatusCode::CREATED);
    let parent_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/topics/{id}/posts"),
        Some(&token),
        Some(json!({"content": "child reply", "parent_id": parent_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["parent_id"], parent_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_author_or_moderator_deletes_a_post(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let stranger = seed_user(&pool, "ivan", "member").await;
    seed_level(&pool, stranger, 5).await;
    let admin = seed_user(&pool, "root", "admin").await;
    let cat = category_id(&pool, "general").await;
    let app = build_test_app(pool);
    let token = token_for(author, "member");

    let topic = create_topic_via_api(&app, &token, cat, "Posts", false).await;
    let id = topic["id"].as_i64().unwrap();
    let (_, body) = reply(&app, &token, id, "target").await;
    let post_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/posts/{post_id}"),
        Some(&token_for(stranger, "member")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/posts/{post_id}"),
        Some(&token_for(admin, "admin")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
