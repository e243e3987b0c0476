//! Services module
//!
//! This module contains business logic services

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod bot;
pub mod catalog;

// Re-export commonly used services
pub use admin::AdminService;
pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use bot::{BotService, SendOutcome, WebhookOutcome};
pub use catalog::CatalogService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;
use crate::whatsapp::WhatsAppClient;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub db: DatabaseService,
    pub bot_service: BotService,
    pub auth_service: AuthService,
    pub admin_service: AdminService,
    pub catalog_service: CatalogService,
    pub analytics_service: AnalyticsService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService, settings: &Settings) -> Result<Self> {
        let client = WhatsAppClient::new(&settings.whatsapp)?;
        let bot_service = BotService::new(db.clone(), client, settings.bot.clone());
        let auth_service = AuthService::new(db.clone(), settings.admin.clone());
        let admin_service = AdminService::new(db.clone(), auth_service.clone());
        let catalog_service = CatalogService::new(db.clone());
        let analytics_service = AnalyticsService::new(db.clone());

        Ok(Self {
            db,
            bot_service,
            auth_service,
            admin_service,
            catalog_service,
            analytics_service,
        })
    }

    /// Health check of the backing services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            database_healthy: self.db.is_healthy().await,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, Copy)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }
}
