//! Handlers for the question/answer solution workflow.
//!
//! A question topic moves between `unanswered` and `solved`; at most one of
//! its posts carries the solution flag at any instant. The clear-previous /
//! mark-new pair runs in one repository transaction; two concurrent marks
//! still race on which wins, which is accepted last-write-wins behavior.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::post::Post;
use campus_db::models::topic::Topic;
use campus_db::repositories::{PostRepo, TopicRepo};
use campus_events::bus::EVENT_SOLUTION_MARKED;
use campus_events::ForumEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::permissions::{permissions_on, viewer_for};
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch the post and its topic, and gate the transition: question topics
/// only, topic author or moderator only.
async fn authorize_transition(
    state: &AppState,
    auth: &AuthUser,
    post_id: DbId,
) -> AppResult<(Post, Topic)> {
    let post = PostRepo::find_by_id(&state.pool, post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        }))?;

    let topic = TopicRepo::find_by_id(&state.pool, post.topic_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id: post.topic_id,
        }))?;

    if !topic.is_question {
        return Err(AppError::NotAQuestion);
    }

    let viewer = viewer_for(&state.pool, &state.config.forum.trust, auth).await?;
    let perms = permissions_on(Some(&viewer), &topic);
    if viewer.user_id != topic.author_id && !perms.can_moderate {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the topic author or a moderator can change the solution".into(),
        )));
    }

    Ok((post, topic))
}

/// POST /posts/{id}/solution
///
/// Mark a post as the accepted solution. Any previously marked post is
/// cleared first, and the topic becomes solved.
pub async fn mark_solution(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (post, topic) = authorize_transition(&state, &auth, post_id).await?;

    let updated = PostRepo::mark_solution(&state.pool, topic.id, post.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post.id,
        }))?;

    state.events.publish(
        ForumEvent::new(EVENT_SOLUTION_MARKED)
            .with_topic(topic.id)
            .with_post(post.id)
            .with_actor(auth.user_id)
            .with_payload(json!({
                "post_author_id": post.author_id,
                "topic_title": topic.title,
            })),
    );

    tracing::info!(
        user_id = auth.user_id,
        topic_id = topic.id,
        post_id = post.id,
        "Solution marked"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /posts/{id}/solution
///
/// Unmark the solution; the topic reverts to unanswered.
pub async fn unmark_solution(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (post, topic) = authorize_transition(&state, &auth, post_id).await?;

    let updated = PostRepo::unmark_solution(&state.pool, topic.id, post.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post.id,
        }))?;

    tracing::info!(
        user_id = auth.user_id,
        topic_id = topic.id,
        post_id = post.id,
        "Solution unmarked"
    );

    Ok(Json(DataResponse { data: updated }))
}
