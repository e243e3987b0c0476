//! Test database helper utilities
//!
//! Database-backed tests run against the PostgreSQL instance named by
//! `TEST_DATABASE_URL` and are skipped when it is not set.

use sqlx::PgPool;
use std::sync::Once;
use ptsp_bot::database::{run_migrations, DatabaseService};
use ptsp_bot::models::{CatalogImport, ImportSummary, User};

static INIT: Once = Once::new();

/// Migrated test database, emptied on creation
pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
}

impl TestDatabase {
    /// Connect to `TEST_DATABASE_URL`, or `None` when it is not set
    pub async fn from_env() -> Option<Self> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        });

        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return None;
        };

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let db = Self { pool, database_url };
        db.cleanup().await.expect("Failed to clean test database");
        Some(db)
    }

    pub fn service(&self) -> DatabaseService {
        DatabaseService::new(self.pool.clone())
    }

    /// Clean all test data from the database, keeping seeded settings
    pub async fn cleanup(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "TRUNCATE admin_activity_logs, admin_users, messages, user_sessions, users, sop, persyaratan, layanan, kategori RESTART IDENTITY CASCADE",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("UPDATE settings SET value = NULL WHERE key = 'link_video_youtube'")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Load the sample catalog
    pub async fn load_catalog(&self) -> ImportSummary {
        let catalog: CatalogImport =
            serde_json::from_value(super::sample_catalog()).expect("Sample catalog must parse");
        self.service()
            .catalog
            .import(&catalog)
            .await
            .expect("Failed to import sample catalog")
    }

    /// Run a statement against the test database, e.g. to deactivate catalog rows
    pub async fn execute(&self, sql: &str) {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .expect("Failed to execute statement");
    }

    pub async fn user(&self, phone: &str) -> Option<User> {
        self.service()
            .users
            .find_by_phone(phone)
            .await
            .expect("Failed to load user")
    }

    /// Count records in a table
    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
