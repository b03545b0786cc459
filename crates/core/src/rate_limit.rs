//! Rate limiting for low-trust accounts.
//!
//! Only the lowest trust tier is throttled. The check is a count of rows the
//! principal authored inside the rolling window, read before the write it
//! guards; the store's serialized write path keeps the race window narrow
//! (a concurrent request can gain at most one extra action).

use chrono::Duration;

use crate::error::CoreError;
use crate::trust::TrustTier;

/// Throttle caps for trust tier 1, injectable for tuning and testing.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Topics a tier-1 account may create per rolling window.
    pub topics_per_window: i64,
    /// Posts a tier-1 account may create per rolling window.
    pub posts_per_window: i64,
    /// Rolling window length in minutes.
    pub window_minutes: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            topics_per_window: 1,
            posts_per_window: 3,
            window_minutes: 60,
        }
    }
}

impl RateLimitPolicy {
    /// The rolling window as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::minutes(self.window_minutes)
    }

    /// Check topic creation for a principal whose recent-topic count is known.
    pub fn check_topic(&self, tier: TrustTier, recent_count: i64) -> Result<(), CoreError> {
        self.check(tier, recent_count, self.topics_per_window, "topics")
    }

    /// Check post creation for a principal whose recent-post count is known.
    pub fn check_post(&self, tier: TrustTier, recent_count: i64) -> Result<(), CoreError> {
        self.check(tier, recent_count, self.posts_per_window, "replies")
    }

    fn check(
        &self,
        tier: TrustTier,
        recent_count: i64,
        cap: i64,
        noun: &str,
    ) -> Result<(), CoreError> {
        if tier > TrustTier::Novice {
            return Ok(());
        }
        if recent_count >= cap {
            return Err(CoreError::RateLimited(format!(
                "Limit of {cap} {noun} per {} minutes reached",
                self.window_minutes
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
