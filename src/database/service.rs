//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, UserRepository, MessageRepository, CatalogRepository, AdminRepository, SettingsRepository};
use crate::models::*;
use crate::utils::errors::BotError;
use crate::utils::logging::log_admin_action;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub messages: MessageRepository,
    pub catalog: CatalogRepository,
    pub admins: AdminRepository,
    pub settings: SettingsRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            catalog: CatalogRepository::new(pool.clone()),
            admins: AdminRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Whether the database answers a trivial query
    pub async fn is_healthy(&self) -> bool {
        crate::database::health_check(&self.pool).await.is_ok()
    }

    /// Active service with its active requirements and SOP steps
    pub async fn layanan_detail(&self, public_id: &str) -> Result<Option<LayananDetail>, BotError> {
        let Some(row) = self.catalog.find_active_layanan(public_id).await? else {
            return Ok(None);
        };

        let persyaratan = self.catalog.active_persyaratan(row.layanan.id).await?;
        let sop = self.catalog.active_sop(row.layanan.id).await?;

        Ok(Some(LayananDetail {
            layanan: row.layanan,
            kategori_kode: row.kategori_kode,
            kategori_nama: row.kategori_nama,
            persyaratan,
            sop,
        }))
    }

    /// Append to the admin activity log. Failures are logged, never returned.
    pub async fn log_activity(&self, request: CreateActivityRequest) {
        let admin_id = request.admin_id;
        let action = request.action.clone();
        let target = request.target_type.clone();
        let description = request.description.clone();
        match self.admins.log_activity(request).await {
            Ok(()) => log_admin_action(admin_id, &action, target.as_deref(), description.as_deref()),
            Err(e) => tracing::warn!(admin_id = admin_id, action = %action, error = %e, "Failed to write activity log"),
        }
    }

    /// Log a message and count it against the user
    pub async fn record_message(&self, request: CreateMessageRequest) -> Result<Message, BotError> {
        let user_id = request.user_id;
        let message = self.messages.create(request).await?;
        self.users.increment_messages(user_id).await?;
        Ok(message)
    }
}
