//! Handlers for post creation and deletion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use campus_core::error::CoreError;
use campus_core::forum;
use campus_core::types::DbId;
use campus_db::models::post::CreatePost;
use campus_db::repositories::{PostRepo, TopicRepo};
use campus_events::bus::EVENT_POST_CREATED;
use campus_events::ForumEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::permissions::viewer_for;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /topics/{id}/posts
///
/// Create a reply. Locked topics reject; tier-1 accounts are throttled.
/// Mention extraction and notifications ride the event bus afterwards and
/// never fail this call.
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
    Json(input): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    forum::validate_content(&input.content).map_err(AppError::Core)?;

    let topic = TopicRepo::find_by_id(&state.pool, topic_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id: topic_id,
        }))?;

    if topic.is_locked {
        return Err(AppError::Core(CoreError::Forbidden("Topic is locked".into())));
    }

    let policy = &state.config.forum;
    let viewer = viewer_for(&state.pool, &policy.trust, &auth).await?;

    let since = Utc::now() - policy.rate_limit.window();
    let recent = PostRepo::count_recent_by_author(&state.pool, auth.user_id, since).await?;
    policy
        .rate_limit
        .check_post(viewer.tier, recent)
        .map_err(AppError::Core)?;

    // Threading parent: any existing post id is accepted, no tree checks.
    let parent_author_id = match input.parent_id {
        Some(parent_id) => Some(
            PostRepo::find_by_id(&state.pool, parent_id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!(
                        "Parent post {parent_id} not found"
                    )))
                })?
                .author_id,
        ),
        None => None,
    };

    let post = PostRepo::create(&state.pool, topic.id, auth.user_id, &input).await?;

    state.events.publish(
        ForumEvent::new(EVENT_POST_CREATED)
            .with_topic(topic.id)
            .with_post(post.id)
            .with_actor(auth.user_id)
            .with_payload(json!({
                "content": post.content,
                "topic_title": topic.title,
                "topic_author_id": topic.author_id,
                "parent_author_id": parent_author_id,
            })),
    );

    tracing::info!(
        user_id = auth.user_id,
        topic_id = topic.id,
        post_id = post.id,
        "Post created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// DELETE /posts/{id}
///
/// Delete a post. Author or moderator only. A deleted solution post reverts
/// its topic to unsolved.
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id,
        }))?;

    let policy = &state.config.forum;
    let viewer = viewer_for(&state.pool, &policy.trust, &auth).await?;

    if viewer.user_id != post.author_id && !viewer.can_moderate() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the post author or a moderator can delete a post".into(),
        )));
    }

    PostRepo::delete(&state.pool, id).await?;

    tracing::info!(user_id = auth.user_id, post_id = id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}
