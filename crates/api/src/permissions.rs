//! Per-request permission resolution.
//!
//! Trust tiers are re-derived from the progression mirror at the moment of
//! every check; nothing computed earlier in a session is trusted, because a
//! user's level can change between requests.

use campus_core::trust::{self, TopicAccess, TopicPermissions, TrustPolicy, Viewer};
use campus_db::models::topic::Topic;
use campus_db::repositories::UserRepo;
use campus_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Build a [`Viewer`] for the principal, reading its current level.
pub async fn viewer_for(
    pool: &DbPool,
    policy: &TrustPolicy,
    auth: &AuthUser,
) -> AppResult<Viewer> {
    let level = UserRepo::level_of(pool, auth.user_id).await?;
    Ok(Viewer {
        user_id: auth.user_id,
        tier: policy.tier_for_level(level),
        is_admin: trust::is_admin(&auth.role),
    })
}

/// The permission-relevant slice of a topic row.
pub fn topic_access(topic: &Topic) -> TopicAccess {
    TopicAccess {
        author_id: topic.author_id,
        is_question: topic.is_question,
        is_locked: topic.is_locked,
        wiki_mode: topic.wiki_mode,
    }
}

/// Resolve the viewer's permissions on a topic.
pub fn permissions_on(viewer: Option<&Viewer>, topic: &Topic) -> TopicPermissions {
    trust::resolve_permissions(viewer, &topic_access(topic))
}
