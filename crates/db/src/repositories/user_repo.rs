//! Repository for the `users` table.

use shelfbot_core::entitlement::UserRef;
use shelfbot_core::types::UserId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, first_name, username, vip_expiry, is_blocked, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Create the user on first contact, refreshing display fields when the
    /// platform reports new values. Access fields are never touched here.
    pub async fn ensure(pool: &PgPool, user: &UserRef) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (user_id, first_name, username)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET
                first_name = COALESCE(EXCLUDED.first_name, users.first_name),
                username = COALESCE(EXCLUDED.username, users.username)
             WHERE (EXCLUDED.first_name IS NOT NULL
                    AND EXCLUDED.first_name IS DISTINCT FROM users.first_name)
                OR (EXCLUDED.username IS NOT NULL
                    AND EXCLUDED.username IS DISTINCT FROM users.username)
             RETURNING {COLUMNS}"
        );
        let written = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.first_name)
            .bind(&user.username)
            .fetch_optional(pool)
            .await?;

        // No row comes back when the record exists and nothing changed.
        match written {
            Some(row) => Ok(row),
            None => Self::find_by_id(pool, user.id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Find a user by platform id.
    pub async fn find_by_id(pool: &PgPool, user_id: UserId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE user_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Extend VIP access by `days`, counting from now or from the current
    /// expiry, whichever is later.
    ///
    /// Returns `None` if the user does not exist.
    pub async fn grant_vip(
        pool: &PgPool,
        user_id: UserId,
        days: i32,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users
             SET vip_expiry = GREATEST(COALESCE(vip_expiry, NOW()), NOW()) + make_interval(days => $2)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(days)
            .fetch_optional(pool)
            .await
    }

    /// Set or clear the blocked flag. Returns `true` if the user exists.
    pub async fn set_blocked(
        pool: &PgPool,
        user_id: UserId,
        blocked: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_blocked = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(blocked)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
