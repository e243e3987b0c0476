//! Citizen user and session repository implementation

use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};
use crate::models::user::{User, UserSession, SessionUpdate};
use crate::utils::errors::BotError;
use crate::utils::pagination::Pagination;

const USER_COLUMNS: &str =
    "id, phone_number, name, first_interaction, last_interaction, total_messages, created_at, updated_at";

#[derive(FromRow)]
struct UpsertedUser {
    #[sqlx(flatten)]
    user: User,
    inserted: bool,
}

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get or create the user for a phone number and count one interaction.
    ///
    /// Returns the user and whether it was created by this call.
    pub async fn record_interaction(&self, phone_number: &str, name: Option<&str>) -> Result<(User, bool), BotError> {
        let row = sqlx::query_as::<_, UpsertedUser>(&format!(
            r#"
            INSERT INTO users (phone_number, name, total_messages)
            VALUES ($1, $2, 1)
            ON CONFLICT (phone_number) DO UPDATE
            SET last_interaction = NOW(),
                total_messages = users.total_messages + 1,
                name = COALESCE(EXCLUDED.name, users.name),
                updated_at = NOW()
            RETURNING {}, (xmax = 0) AS inserted
            "#,
            USER_COLUMNS
        ))
        .bind(phone_number)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok((row.user, row.inserted))
    }

    /// Get or create the user for a phone number without counting an interaction
    pub async fn ensure(&self, phone_number: &str) -> Result<User, BotError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (phone_number)
            VALUES ($1)
            ON CONFLICT (phone_number) DO UPDATE SET phone_number = EXCLUDED.phone_number
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Count one more message for an existing user
    pub async fn increment_messages(&self, id: i64) -> Result<(), BotError> {
        sqlx::query(
            "UPDATE users SET total_messages = total_messages + 1, last_interaction = NOW(), updated_at = NOW() WHERE id = $1"
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, BotError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find user by phone number
    pub async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, BotError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE phone_number = $1", USER_COLUMNS))
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// List users by most recent interaction, optionally filtered by phone substring
    pub async fn list(&self, search: Option<&str>, pagination: Pagination) -> Result<Vec<User>, BotError> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {} FROM users
            WHERE ($1::TEXT IS NULL OR phone_number LIKE '%' || $1 || '%')
            ORDER BY last_interaction DESC
            LIMIT $2 OFFSET $3
            "#,
            USER_COLUMNS
        ))
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count users matching the listing filter
    pub async fn count_matching(&self, search: Option<&str>) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR phone_number LIKE '%' || $1 || '%')"
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, BotError> {
        self.count_matching(None).await
    }

    /// Count users who interacted at or after `since`
    pub async fn count_active_since(&self, since: DateTime<Utc>) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE last_interaction >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// First-time users per UTC day since `since`
    pub async fn new_users_per_day(&self, since: DateTime<Utc>) -> Result<Vec<(chrono::NaiveDate, i64)>, BotError> {
        let rows: Vec<(chrono::NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT (first_interaction AT TIME ZONE 'UTC')::DATE AS day, COUNT(*)
            FROM users
            WHERE first_interaction >= $1
            GROUP BY day
            "#
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Record the latest menu position; fields left `None` keep their value
    pub async fn upsert_session(&self, user_id: i64, update: &SessionUpdate) -> Result<UserSession, BotError> {
        let session = sqlx::query_as::<_, UserSession>(
            r#"
            INSERT INTO user_sessions (user_id, current_category, current_layanan)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET current_category = COALESCE(EXCLUDED.current_category, user_sessions.current_category),
                current_layanan = COALESCE(EXCLUDED.current_layanan, user_sessions.current_layanan),
                updated_at = NOW()
            RETURNING id, user_id, current_category, current_layanan, created_at, updated_at
            "#
        )
        .bind(user_id)
        .bind(update.category.as_deref())
        .bind(update.layanan.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Get the session of a user
    pub async fn find_session(&self, user_id: i64) -> Result<Option<UserSession>, BotError> {
        let session = sqlx::query_as::<_, UserSession>(
            "SELECT id, user_id, current_category, current_layanan, created_at, updated_at FROM user_sessions WHERE user_id = $1"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }
}
