//! Trust tiers, platform roles, and per-request permission resolution.
//!
//! Trust is derived from the progression level supplied by the external
//! leveling subsystem; the platform role (`admin` vs `member`) is orthogonal
//! and, for admins, meets or exceeds the top tier in every check.

use serde::Serialize;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Well-known role names supplied by the identity provider.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";

/// Whether a role name grants administrator privileges.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

// ---------------------------------------------------------------------------
// Trust tiers
// ---------------------------------------------------------------------------

/// Ordinal trust tier derived from a user's progression level.
///
/// Ordering is meaningful: `Trusted >= Member` etc., so tier gates compare
/// with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    Novice = 1,
    Member = 2,
    Trusted = 3,
    Steward = 4,
}

impl TrustTier {
    /// Numeric rank, 1-based.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Level thresholds mapping a progression level onto a [`TrustTier`].
///
/// Injectable so deployments can tune the gates without touching the logic
/// that consumes them.
#[derive(Debug, Clone)]
pub struct TrustPolicy {
    /// Minimum level for [`TrustTier::Member`].
    pub member_level: i32,
    /// Minimum level for [`TrustTier::Trusted`].
    pub trusted_level: i32,
    /// Minimum level for [`TrustTier::Steward`].
    pub steward_level: i32,
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            member_level: 3,
            trusted_level: 6,
            steward_level: 10,
        }
    }
}

impl TrustPolicy {
    /// Map a raw progression level onto a trust tier.
    pub fn tier_for_level(&self, level: i32) -> TrustTier {
        if level >= self.steward_level {
            TrustTier::Steward
        } else if level >= self.trusted_level {
            TrustTier::Trusted
        } else if level >= self.member_level {
            TrustTier::Member
        } else {
            TrustTier::Novice
        }
    }
}

// ---------------------------------------------------------------------------
// Permission resolution
// ---------------------------------------------------------------------------

/// The acting principal, with trust already derived from its current level.
///
/// Built fresh on every request: permissions must never be computed from a
/// tier cached earlier in the session, since the level can change between
/// requests.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub user_id: DbId,
    pub tier: TrustTier,
    pub is_admin: bool,
}

impl Viewer {
    /// Moderation is topic-independent: admin role or the top trust tier.
    pub fn can_moderate(&self) -> bool {
        self.is_admin || self.tier >= TrustTier::Steward
    }
}

/// The subset of topic state that permission checks depend on.
#[derive(Debug, Clone, Copy)]
pub struct TopicAccess {
    pub author_id: DbId,
    pub is_question: bool,
    pub is_locked: bool,
    pub wiki_mode: bool,
}

/// Permissions of one principal on one topic, resolved per request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TopicPermissions {
    pub can_reply: bool,
    pub can_edit: bool,
    pub can_mark_solution: bool,
    pub can_edit_wiki: bool,
    pub can_moderate: bool,
}

impl TopicPermissions {
    /// Everything false: the anonymous (public read) permission set.
    pub fn none() -> Self {
        Self {
            can_reply: false,
            can_edit: false,
            can_mark_solution: false,
            can_edit_wiki: false,
            can_moderate: false,
        }
    }
}

/// Resolve the permission set of `viewer` on `topic`.
///
/// - `can_reply`: authenticated and the topic is not locked.
/// - `can_edit`: the viewer authored the topic.
/// - `can_mark_solution`: author or moderator, and the topic is a question.
/// - `can_edit_wiki`: tier >= Trusted and the topic is in wiki mode.
/// - `can_moderate`: admin role, or tier >= Steward.
///
/// An absent viewer resolves every permission to false.
pub fn resolve_permissions(viewer: Option<&Viewer>, topic: &TopicAccess) -> TopicPermissions {
    let Some(viewer) = viewer else {
        return TopicPermissions::none();
    };

    let can_moderate = viewer.can_moderate();
    let is_author = viewer.user_id == topic.author_id;

    TopicPermissions {
        can_reply: !topic.is_locked,
        can_edit: is_author,
        can_mark_solution: (is_author || can_moderate) && topic.is_question,
        can_edit_wiki: viewer.tier >= TrustTier::Trusted && topic.wiki_mode,
        can_moderate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
