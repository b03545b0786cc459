use campus_core::rate_limit::RateLimitPolicy;
use campus_core::trust::TrustPolicy;

use crate::auth::jwt::JwtConfig;

/// Tunable forum policy: trust thresholds, throttle caps, page bounds.
///
/// Injectable so the gates can be tuned and unit-tested independently of
/// the logic that consumes them. `Default` carries the production values.
#[derive(Debug, Clone)]
pub struct ForumPolicy {
    /// Progression-level thresholds for trust tiers.
    pub trust: TrustPolicy,
    /// Throttle caps for tier-1 accounts.
    pub rate_limit: RateLimitPolicy,
    /// Page size when the client does not send a limit.
    pub default_page_size: i64,
    /// Upper bound on requested page sizes.
    pub max_page_size: i64,
    /// Upper bound on notification listing size.
    pub max_notifications: i64,
    /// Mention candidates processed per post.
    pub mention_cap: usize,
}

impl Default for ForumPolicy {
    fn default() -> Self {
        Self {
            trust: TrustPolicy::default(),
            rate_limit: RateLimitPolicy::default(),
            default_page_size: 20,
            max_page_size: 50,
            max_notifications: 100,
            mention_cap: campus_core::mentions::MAX_MENTIONS_PER_POST,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT verification configuration (secret, expiry leeway).
    pub jwt: JwtConfig,
    /// Forum policy knobs (trust thresholds, rate limits, page bounds).
    pub forum: ForumPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            forum: ForumPolicy::default(),
        }
    }
}
