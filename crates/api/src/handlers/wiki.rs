//! Handlers for collaborative wiki editing and its history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_core::{forum, slug};
use campus_db::models::wiki_edit::CreateWikiEdit;
use campus_db::repositories::{TopicRepo, WikiEditRepo};
use campus_events::bus::EVENT_WIKI_EDITED;
use campus_events::ForumEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::permissions::{permissions_on, viewer_for};
use crate::query::{clamp_limit, LimitParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /topics/{id}/wiki
///
/// Submit a collaborative content replacement. The history record captures
/// the replaced content and is written before the topic row is updated, in
/// one transaction, so history survives any partial failure.
pub async fn edit_wiki(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
    Json(input): Json<CreateWikiEdit>,
) -> AppResult<impl IntoResponse> {
    forum::validate_content(&input.content).map_err(AppError::Core)?;
    if let Some(ref summary) = input.edit_summary {
        forum::validate_edit_summary(summary).map_err(AppError::Core)?;
    }

    let topic = TopicRepo::find_by_id(&state.pool, topic_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id: topic_id,
        }))?;

    if !topic.wiki_mode {
        return Err(AppError::Core(CoreError::Forbidden(
            "Topic is not collaboratively editable".into(),
        )));
    }

    let viewer = viewer_for(&state.pool, &state.config.forum.trust, &auth).await?;
    let perms = permissions_on(Some(&viewer), &topic);
    if !perms.can_edit_wiki {
        return Err(AppError::Core(CoreError::Forbidden(
            "Collaborative editing requires a higher trust tier".into(),
        )));
    }

    // The preview follows the same truncation rule as topic creation.
    let new_preview = slug::preview(&input.content);

    let edit = WikiEditRepo::append(
        &state.pool,
        topic.id,
        auth.user_id,
        &input.content,
        &new_preview,
        input.edit_summary.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Topic",
        id: topic_id,
    }))?;

    state.events.publish(
        ForumEvent::new(EVENT_WIKI_EDITED)
            .with_topic(topic.id)
            .with_actor(auth.user_id)
            .with_payload(json!({
                "topic_author_id": topic.author_id,
                "topic_title": topic.title,
            })),
    );

    tracing::info!(
        user_id = auth.user_id,
        topic_id = topic.id,
        edit_id = edit.id,
        "Wiki edit applied"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: edit })))
}

/// GET /topics/{id}/wiki
///
/// List a topic's edit history, newest first. Public read.
pub async fn list_wiki_history(
    State(state): State<AppState>,
    Path(topic_id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let policy = &state.config.forum;

    // History reads reuse the page bounds of topic listings.
    let limit = clamp_limit(params.limit, policy.default_page_size, policy.max_page_size);

    if TopicRepo::find_by_id(&state.pool, topic_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id: topic_id,
        }));
    }

    let edits = WikiEditRepo::list_for_topic(&state.pool, topic_id, limit).await?;
    Ok(Json(DataResponse { data: edits }))
}
