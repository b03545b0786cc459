//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic `?limit=` parameter for bounded listings.
///
/// Values are clamped against the forum policy in the handler.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Clamp a requested limit into `[1, max]`, falling back to `default`.
pub fn clamp_limit(requested: Option<i64>, default: i64, max: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, max)
}
