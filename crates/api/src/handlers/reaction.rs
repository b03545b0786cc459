//! Handlers for adding and removing reactions on topics and posts.
//!
//! Adds are idempotent: repeating the same (user, target, kind) is a no-op,
//! never a conflict error.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use campus_core::error::CoreError;
use campus_core::reactions::ReactionKind;
use campus_core::types::DbId;
use campus_db::models::reaction::{TARGET_POST, TARGET_TOPIC};
use campus_db::repositories::{PostRepo, ReactionRepo, TopicRepo};
use campus_events::bus::EVENT_REACTION_ADDED;
use campus_events::ForumEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Parse and validate a reaction kind path segment.
fn parse_kind(raw: &str) -> AppResult<ReactionKind> {
    ReactionKind::parse(raw).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown reaction kind '{raw}'"
        )))
    })
}

/// PUT /topics/{id}/reactions/{kind}
pub async fn react_to_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((topic_id, kind)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;

    let topic = TopicRepo::find_by_id(&state.pool, topic_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id: topic_id,
        }))?;

    let added = ReactionRepo::add(
        &state.pool,
        auth.user_id,
        TARGET_TOPIC,
        topic.id,
        kind.as_str(),
    )
    .await?;

    // Notify only on a genuinely new reaction, never on the idempotent
    // repeat.
    if added {
        state.events.publish(
            ForumEvent::new(EVENT_REACTION_ADDED)
                .with_topic(topic.id)
                .with_actor(auth.user_id)
                .with_payload(json!({
                    "target_author_id": topic.author_id,
                    "kind": kind.as_str(),
                })),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /topics/{id}/reactions/{kind}
pub async fn unreact_to_topic(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((topic_id, kind)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    ReactionRepo::remove(&state.pool, auth.user_id, TARGET_TOPIC, topic_id, kind.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /posts/{id}/reactions/{kind}
pub async fn react_to_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((post_id, kind)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;

    let post = PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        }))?;

    let added = ReactionRepo::add(
        &state.pool,
        auth.user_id,
        TARGET_POST,
        post.id,
        kind.as_str(),
    )
    .await?;

    if added {
        state.events.publish(
            ForumEvent::new(EVENT_REACTION_ADDED)
                .with_topic(post.topic_id)
                .with_post(post.id)
                .with_actor(auth.user_id)
                .with_payload(json!({
                    "target_author_id": post.author_id,
                    "kind": kind.as_str(),
                })),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /posts/{id}/reactions/{kind}
pub async fn unreact_to_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((post_id, kind)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    ReactionRepo::remove(&state.pool, auth.user_id, TARGET_POST, post_id, kind.as_str()).await?;
    Ok(StatusCode::NO_CONTENT)
}
