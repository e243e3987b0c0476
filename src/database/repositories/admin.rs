//! Admin operator and activity log repository implementation

use sqlx::PgPool;
use crate::models::admin::{AdminUser, ActivityLog, CreateActivityRequest};
use crate::utils::errors::BotError;
use crate::utils::pagination::Pagination;

const ADMIN_COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, created_at, updated_at, last_login";

/// Column values of a new or edited operator
#[derive(Debug, Clone)]
pub struct AdminRecord<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub role: &'a str,
    pub is_active: bool,
}

#[derive(Clone, Debug)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AdminUser>, BotError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!("SELECT {} FROM admin_users WHERE id = $1", ADMIN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, BotError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!("SELECT {} FROM admin_users WHERE username = $1", ADMIN_COLUMNS))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>, BotError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!("SELECT {} FROM admin_users WHERE email = $1", ADMIN_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    /// Operators newest first, optionally filtered by a case-insensitive username substring
    pub async fn list(&self, search: Option<&str>, pagination: Pagination) -> Result<Vec<AdminUser>, BotError> {
        let admins = sqlx::query_as::<_, AdminUser>(&format!(
            r#"
            SELECT {} FROM admin_users
            WHERE ($1::TEXT IS NULL OR username ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            ADMIN_COLUMNS
        ))
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }

    pub async fn count_matching(&self, search: Option<&str>) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM admin_users WHERE ($1::TEXT IS NULL OR username ILIKE '%' || $1 || '%')"
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    pub async fn count(&self) -> Result<i64, BotError> {
        self.count_matching(None).await
    }

    pub async fn create(&self, record: &AdminRecord<'_>, password_hash: &str) -> Result<AdminUser, BotError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            r#"
            INSERT INTO admin_users (username, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ADMIN_COLUMNS
        ))
        .bind(record.username)
        .bind(record.email)
        .bind(password_hash)
        .bind(record.role)
        .bind(record.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Update account fields; a `None` password hash keeps the stored one
    pub async fn update(&self, id: i64, record: &AdminRecord<'_>, password_hash: Option<&str>) -> Result<Option<AdminUser>, BotError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            r#"
            UPDATE admin_users
            SET username = $2, email = $3, role = $4, is_active = $5,
                password_hash = COALESCE($6, password_hash), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ADMIN_COLUMNS
        ))
        .bind(id)
        .bind(record.username)
        .bind(record.email)
        .bind(record.role)
        .bind(record.is_active)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn update_email(&self, id: i64, email: Option<&str>) -> Result<Option<AdminUser>, BotError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            "UPDATE admin_users SET email = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), BotError> {
        sqlx::query("UPDATE admin_users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<(), BotError> {
        sqlx::query("UPDATE admin_users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<AdminUser>, BotError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            "UPDATE admin_users SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, BotError> {
        let result = sqlx::query("DELETE FROM admin_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Activity log methods

    pub async fn log_activity(&self, request: CreateActivityRequest) -> Result<(), BotError> {
        sqlx::query(
            r#"
            INSERT INTO admin_activity_logs (admin_id, action, target_type, target_id, description, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#
        )
        .bind(request.admin_id)
        .bind(request.action)
        .bind(request.target_type)
        .bind(request.target_id)
        .bind(request.description)
        .bind(request.ip_address)
        .bind(request.user_agent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Activity log newest first, with the acting operator's username
    pub async fn list_activity(&self, pagination: Pagination) -> Result<Vec<ActivityLog>, BotError> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT l.id, l.admin_id, a.username AS admin_username, l.action, l.target_type, l.target_id,
                   l.description, l.ip_address, l.user_agent, l.created_at
            FROM admin_activity_logs l
            LEFT JOIN admin_users a ON a.id = l.admin_id
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $1 OFFSET $2
            "#
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    pub async fn count_activity(&self) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_activity_logs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
