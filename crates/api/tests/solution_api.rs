//! Integration tests for the solution marking workflow over HTTP.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use common::*;

/// Create a question topic and one reply, returning `(topic_id, post_id)`.
async fn question_with_reply(
    app: &axum::Router,
    pool: &PgPool,
    author_token: &str,
    replier_token: &str,
) -> (i64, i64) {
    let cat = category_id(pool, "questions").await;
    let topic = create_topic_via_api(app, author_token, cat, "How does this work?", true).await;
    let topic_id = topic["id"].as_i64().unwrap();

    let (status, body) = request(
        app,
        Method::POST,
        &format!("/api/v1/topics/{topic_id}/posts"),
        Some(replier_token),
        Some(json!({"content": "like this"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (topic_id, body["data"]["id"].as_i64().unwrap())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn author_marks_and_remarks_solutions(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let helper = seed_user(&pool, "ivan", "member").await;
    seed_level(&pool, helper, 5).await;
    let app = build_test_app(pool.clone());
    let author_token = token_for(author, "member");
    let helper_token = token_for(helper, "member");

    let (topic_id, p1) =
        question_with_reply(&app, &pool, &author_token, &helper_token).await;
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/topics/{topic_id}/posts"),
        Some(&helper_token),
        Some(json!({"content": "or like this"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let p2 = body["data"]["id"].as_i64().unwrap();

    // Mark the first reply.
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/posts/{p1}/solution"),
        Some(&author_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_solution"], true);

    // Re-mark onto the second: the first is cleared, the topic stays solved.
    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/v1/posts/{p2}/solution"),
        Some(&author_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = request(
        &app,
        Method::GET,
        &format!("/api/v1/topics/{topic_id}?track_view=false"),
        None,
        None,
    )
    .await;
    assert_eq!(detail["data"]["is_solved"], true);
    let posts = detail["data"]["posts"].as_array().unwrap();
    let solutions: Vec<_> = posts
        .iter()
        .filter(|p| p["is_solution"] == true)
        .collect();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["id"].as_i64().unwrap(), p2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn marking_on_non_question_fails_even_for_author(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let cat = category_id(&pool, "general").await;
    let app = build_test_app(pool);
    let token = token_for(author, "member");

    let topic = create_topic_via_api(&app, &token, cat, "Not a question", false).await;
    let topic_id = topic["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/topics/{topic_id}/posts"),
        Some(&token),
        Some(json!({"content": "reply"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/posts/{post_id}/solution"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_A_QUESTION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bystander_cannot_mark_a_solution(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let helper = seed_user(&pool, "ivan", "member").await;
    seed_level(&pool, helper, 5).await;
    let app = build_test_app(pool.clone());
    let author_token = token_for(author, "member");
    let helper_token = token_for(helper, "member");

    let (_, post_id) = question_with_reply(&app, &pool, &author_token, &helper_token).await;

    // The replier is neither the topic author nor a moderator.
    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/posts/{post_id}/solution"),
        Some(&helper_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_mark_on_someone_elses_question(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let helper = seed_user(&pool, "ivan", "member").await;
    seed_level(&pool, helper, 5).await;
    let admin = seed_user(&pool, "root", "admin").await;
    let app = build_test_app(pool.clone());

    let (_, post_id) = question_with_reply(
        &app,
        &pool,
        &token_for(author, "member"),
        &token_for(helper, "member"),
    )
    .await;

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/api/v1/posts/{post_id}/solution"),
        Some(&token_for(admin, "admin")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_solution"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unmarking_reverts_the_topic(pool: PgPool) {
    let author = seed_user(&pool, "maria", "member").await;
    seed_level(&pool, author, 5).await;
    let helper = seed_user(&pool, "ivan", "member").await;
    seed_level(&pool, helper, 5).await;
    let app = build_test_app(pool.clone());
    let author_token = token_for(author, "member");

    let (topic_id, post_id) = question_with_reply(
        &app,
        &pool,
        &author_token,
        &token_for(helper, "member"),
    )
    .await;

    let (status, _) = request(
        &app,
        Method::POST,
        &format!("/api/v1/posts/{post_id}/solution"),
        Some(&author_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        &app,
        Method::DELETE,
        &format!("/api/v1/posts/{post_id}/solution"),
        Some(&author_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_solution"], false);

    let (_, detail) = request(
        &app,
        Method::GET,
        &format!("/api/v1/topics/{topic_id}?track_view=false"),
        None,
        None,
    )
    .await;
    assert_eq!(detail["data"]["is_solved"], false);
}
