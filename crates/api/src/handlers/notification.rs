//! Handlers for the `/notifications` resource.
//!
//! Read-state is mutated only by the recipient; clients poll these
//! endpoints at their own interval.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::notification::Notification;
use campus_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{clamp_limit, LimitParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Listing payload: notifications plus the unread tally for badge display.
#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub data: Vec<Notification>,
    pub unread_count: i64,
}

/// GET /notifications
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let policy = &state.config.forum;
    let limit = clamp_limit(params.limit, policy.default_page_size, policy.max_notifications);

    let data = NotificationRepo::list_for_user(&state.pool, auth.user_id, limit).await?;
    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(NotificationList { data, unread_count }))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: json!({ "unread": count }),
    }))
}

/// POST /notifications/{id}/read
///
/// Mark one notification as read. Scoped to the recipient; anyone else's
/// notification is indistinguishable from a missing one.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated = NotificationRepo::mark_read(&state.pool, id, auth.user_id).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let updated = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        updated,
        "All notifications marked read"
    );

    Ok(Json(DataResponse {
        data: json!({ "updated": updated }),
    }))
}
