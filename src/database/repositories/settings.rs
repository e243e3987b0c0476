//! Application settings repository implementation

use sqlx::PgPool;
use crate::models::admin::AppSetting;
use crate::utils::errors::BotError;

#[derive(Clone, Debug)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Value of a setting; missing rows and NULL values both give `None`
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, BotError> {
        let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|(value,)| value))
    }

    pub async fn list(&self) -> Result<Vec<AppSetting>, BotError> {
        let settings = sqlx::query_as::<_, AppSetting>(
            "SELECT id, key, value, description, created_at, updated_at FROM settings ORDER BY key ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Create or update a setting; a `None` description keeps the stored one
    pub async fn upsert(&self, key: &str, value: Option<&str>, description: Option<&str>) -> Result<AppSetting, BotError> {
        let setting = sqlx::query_as::<_, AppSetting>(
            r#"
            INSERT INTO settings (key, value, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value,
                description = COALESCE(EXCLUDED.description, settings.description),
                updated_at = NOW()
            RETURNING id, key, value, description, created_at, updated_at
            "#
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }
}
