//! PostgreSQL pool and migrations

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;
use crate::config::DatabaseConfig;
use crate::utils::errors::BotError;

pub type DatabasePool = Pool<Postgres>;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Open the pool and make sure the server answers
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, BotError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(Some(IDLE_TIMEOUT))
        .max_lifetime(Some(MAX_LIFETIME))
        .connect(&config.url)
        .await?;

    health_check(&pool).await?;

    info!(
        database = %redact_url(&config.url),
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Apply pending migrations from `./migrations`
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), BotError> {
    let migrator = sqlx::migrate!("./migrations");
    info!(available = migrator.iter().count(), "Applying database migrations");
    migrator.run(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}

pub async fn health_check(pool: &DatabasePool) -> Result<(), BotError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Connection URL without the password, for logs
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_hides_password() {
        let redacted = redact_url("postgresql://ptsp:s3cret@db:5432/ptsp_bot");
        assert!(!redacted.contains("s3cret"));
        assert!(redacted.contains("ptsp:***@db:5432/ptsp_bot"));
    }

    #[test]
    fn test_redact_url_without_password() {
        assert_eq!(redact_url("postgresql://db/ptsp_bot"), "postgresql://db/ptsp_bot");
        assert_eq!(redact_url("not a url"), "<invalid url>");
    }
}
