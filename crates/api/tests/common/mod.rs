//! Shared helpers for API integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the same
//! middleware stack (CORS, request ID, timeout, tracing, panic recovery)
//! that production uses. Tokens are minted locally with the test secret,
//! standing in for the external identity provider.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use campus_api::auth::jwt::{generate_access_token, JwtConfig};
use campus_api::config::{ForumPolicy, ServerConfig};
use campus_api::dispatcher::Dispatcher;
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_core::types::DbId;
use campus_events::EventBus;

const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        forum: ForumPolicy::default(),
    }
}

/// Build the application router with the given pool.
///
/// The secondary-effect dispatcher is spawned exactly as in `main.rs`, so
/// mention/notification/view-count effects happen for real (asynchronously;
/// see [`wait_until`]).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let events = Arc::new(EventBus::default());

    let cancel = tokio_util::sync::CancellationToken::new();
    let dispatcher = Dispatcher::new(pool.clone(), config.forum.mention_cap);
    tokio::spawn(dispatcher.run(events.subscribe(), cancel));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        events,
    };

    build_app_router(state, &config)
}

/// Mint a bearer token for a user, as the identity provider would.
pub fn token_for(user_id: DbId, role: &str) -> String {
    let config = test_config();
    generate_access_token(user_id, role, &config.jwt).expect("token generation")
}

/// Issue a request and return `(status, parsed body)`.
///
/// Empty bodies parse as `Null`.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request construction");

    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Poll `probe` until it returns true or ~2 seconds elapse.
///
/// Secondary effects ride the event bus and land asynchronously; tests that
/// assert on them must wait for the dispatcher to drain.
pub async fn wait_until<F, Fut>(mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if probe().await {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    false
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a user mirror row and return its id.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO users (username, role) VALUES ($1, $2) RETURNING id")
        .bind(username)
        .bind(role)
        .fetch_one(pool)
        .await
        .expect("seed user")
}

/// Upsert a progression level for a user.
pub async fn seed_level(pool: &PgPool, user_id: DbId, level: i32) {
    sqlx::query(
        "INSERT INTO user_levels (user_id, level) VALUES ($1, $2) \
         ON CONFLICT (user_id) DO UPDATE SET level = EXCLUDED.level",
    )
    .bind(user_id)
    .bind(level)
    .execute(pool)
    .await
    .expect("seed level");
}

/// Id of a category seeded by the migration.
pub async fn category_id(pool: &PgPool, slug: &str) -> DbId {
    sqlx::query_scalar("SELECT id FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_one(pool)
        .await
        .expect("seeded category")
}

/// Create a topic through the API, returning its JSON.
pub async fn create_topic_via_api(
    app: &Router,
    token: &str,
    category_id: DbId,
    title: &str,
    is_question: bool,
) -> serde_json::Value {
    let (status, body) = request(
        app,
        Method::POST,
        "/api/v1/topics",
        Some(token),
        Some(serde_json::json!({
            "title": title,
            "content": format!("{title} body"),
            "category_id": category_id,
            "is_question": is_question,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "topic creation failed: {body}");
    body["data"].clone()
}
