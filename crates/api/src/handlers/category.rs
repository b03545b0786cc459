//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use campus_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /categories
///
/// List all categories. Public read; categories are immutable reference data.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}
