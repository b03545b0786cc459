//! Route definitions for the `/posts` resource.

use axum::routing::{delete, post, put};
use axum::Router;

use crate::handlers::{post as post_handlers, reaction, solution};
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// DELETE /{id}                    -> delete_post
/// POST   /{id}/solution           -> mark_solution
/// DELETE /{id}/solution           -> unmark_solution
/// PUT    /{id}/reactions/{kind}   -> react_to_post
/// DELETE /{id}/reactions/{kind}   -> unreact_to_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(post_handlers::delete_post))
        .route(
            "/{id}/solution",
            post(solution::mark_solution).delete(solution::unmark_solution),
        )
        .route(
            "/{id}/reactions/{kind}",
            put(reaction::react_to_post).delete(reaction::unreact_to_post),
        )
}
