//! Shared helpers for repository integration tests.

use sqlx::PgPool;

use campus_core::types::DbId;
use campus_db::models::post::CreatePost;
use campus_db::models::topic::CreateTopic;

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

/// A minimal topic creation DTO.
pub fn new_topic(title: &str, category_id: DbId) -> CreateTopic {
    CreateTopic {
        title: title.to_string(),
        content: format!("{title} content"),
        category_id,
        is_question: false,
        wiki_mode: false,
        tags: Vec::new(),
    }
}

/// A question-flavored topic creation DTO.
pub fn new_question(title: &str, category_id: DbId) -> CreateTopic {
    CreateTopic {
        is_question: true,
        ..new_topic(title, category_id)
    }
}

/// A minimal post creation DTO.
pub fn new_post(content: &str) -> CreatePost {
    CreatePost {
        content: content.to_string(),
        parent_id: None,
    }
}

/// Create a topic the way the API layer does: slug and preview precomputed.
pub async fn create_topic(
    pool: &PgPool,
    author_id: DbId,
    input: &CreateTopic,
) -> campus_db::models::topic::Topic {
    let now = chrono::Utc::now();
    let slug = campus_core::slug::unique_slug(&input.title, now);
    let preview = campus_core::slug::preview(&input.content);
    campus_db::repositories::TopicRepo::create(pool, author_id, input, &slug, &preview)
        .await
        .expect("create topic")
}
