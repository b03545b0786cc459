//! Read-only repository over the identity and progression mirrors.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::user::User;

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, display_name, role, created_at";

/// Read operations for users and their progression levels.
///
/// Both tables are written by external subsystems; this service only
/// consumes them.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by name, case-insensitively (mention resolution).
    pub async fn find_by_username_ci(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// The user's current progression level; 0 when the progression
    /// subsystem has not written a row yet.
    pub async fn level_of(pool: &PgPool, user_id: DbId) -> Result<i32, sqlx::Error> {
        let level: Option<i32> =
            sqlx::query_scalar("SELECT level FROM user_levels WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(level.unwrap_or(0))
    }
}
