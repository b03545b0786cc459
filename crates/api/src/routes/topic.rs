//! Route definitions for the `/topics` resource.
//!
//! Reads are public (detail resolves optional auth for permission display);
//! every write requires authentication and re-derives permissions.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{post as post_handlers, reaction, topic, wiki};
use crate::state::AppState;

/// Routes mounted at `/topics`.
///
/// ```text
/// GET    /                        -> list_topics
/// POST   /                        -> create_topic
/// GET    /{id_or_slug}            -> get_topic
/// PATCH  /{id}                    -> update_topic
/// DELETE /{id}                    -> delete_topic
/// POST   /{id}/posts              -> create_post
/// GET    /{id}/wiki               -> list_wiki_history
/// POST   /{id}/wiki               -> edit_wiki
/// PUT    /{id}/reactions/{kind}   -> react_to_topic
/// DELETE /{id}/reactions/{kind}   -> unreact_to_topic
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(topic::list_topics).post(topic::create_topic))
        .route(
            "/{id}",
            get(topic::get_topic)
                .patch(topic::update_topic)
                .delete(topic::delete_topic),
        )
        .route("/{id}/posts", post(post_handlers::create_post))
        .route(
            "/{id}/wiki",
            get(wiki::list_wiki_history).post(wiki::edit_wiki),
        )
        .route(
            "/{id}/reactions/{kind}",
            put(reaction::react_to_topic).delete(reaction::unreact_to_topic),
        )
}
