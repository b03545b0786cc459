//! Domain-level error type shared by every layer above `campus-core`.

use crate::types::DbId;

/// Errors produced by domain logic and surfaced through the API layer.
///
/// `NotFound` is returned uniformly whether the entity never existed or was
/// already deleted, so callers cannot distinguish the two cases.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity does not exist (or is no longer visible).
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed validation before any write was attempted.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness or state conflict that could not be resolved internally.
    #[error("{0}")]
    Conflict(String),

    /// No principal, or the presented credential did not verify.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the principal lacks the required permission.
    #[error("{0}")]
    Forbidden(String),

    /// The principal exhausted a rate-limit window.
    #[error("{0}")]
    RateLimited(String),

    /// An unexpected internal failure.
    #[error("{0}")]
    Internal(String),
}
