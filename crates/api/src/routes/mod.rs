pub mod category;
pub mod health;
pub mod notification;
pub mod post;
pub mod topic;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                          GET list (public)
///
/// /topics                              GET list (public), POST create
/// /topics/{id_or_slug}                 GET detail (public, optional auth)
/// /topics/{id}                         PATCH update, DELETE
/// /topics/{id}/posts                   POST create reply
/// /topics/{id}/wiki                    GET history (public), POST edit
/// /topics/{id}/reactions/{kind}        PUT add, DELETE remove
///
/// /posts/{id}                          DELETE
/// /posts/{id}/solution                 POST mark, DELETE unmark
/// /posts/{id}/reactions/{kind}         PUT add, DELETE remove
///
/// /notifications                       GET list (+unread count)
/// /notifications/unread-count          GET
/// /notifications/{id}/read             POST
/// /notifications/read-all              POST
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/topics", topic::router())
        .nest("/posts", post::router())
        .nest("/notifications", notification::router())
}
