//! Operator account management, profile and application settings

use serde::Deserialize;
use tracing::info;
use crate::database::repositories::AdminRecord;
use crate::database::DatabaseService;
use crate::models::{ActivityLog, AdminActor, AdminProfile, AppSetting, CreateAdminRequest, UpdateAdminRequest};
use crate::services::auth::{hash_password, AuthService};
use crate::utils::errors::{BotError, Result};
use crate::utils::helpers::is_valid_email;
use crate::utils::pagination::{Page, Pagination};

pub const ADMINS_PER_PAGE: i64 = 10;
pub const ACTIVITY_PER_PAGE: i64 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AdminService {
    db: DatabaseService,
    auth: AuthService,
}

impl AdminService {
    pub fn new(db: DatabaseService, auth: AuthService) -> Self {
        Self { db, auth }
    }

    pub async fn list(&self, search: Option<&str>, page: Option<i64>) -> Result<Page<AdminProfile>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let pagination = Pagination::new(page, ADMINS_PER_PAGE);
        let admins = self.db.admins.list(search, pagination).await?;
        let total = self.db.admins.count_matching(search).await?;
        Ok(Page::new(admins, pagination, total).map(AdminProfile::from))
    }

    /// Create an operator account; the username must be unused
    pub async fn create(&self, actor: &AdminActor, request: &CreateAdminRequest) -> Result<AdminProfile> {
        let admin = self.register(request).await?;

        self.db
            .log_activity(actor.activity(
                "create_admin",
                Some(("admin", admin.id)),
                format!("Menambahkan admin {} ({})", admin.username, admin.role),
            ))
            .await;
        info!(admin_id = actor.id(), target = admin.id, "Admin account created");

        Ok(admin)
    }

    /// Validate and insert an account without an acting operator (used by the CLI)
    pub async fn register(&self, request: &CreateAdminRequest) -> Result<AdminProfile> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(BotError::InvalidInput("Username harus diisi".to_string()));
        }
        self.auth.check_new_password(&request.password)?;
        let email = normalized_email(request.email.as_deref())?;

        if self.db.admins.find_by_username(username).await?.is_some() {
            return Err(BotError::Conflict(format!("Username {} sudah digunakan", username)));
        }
        if let Some(email) = email {
            if self.db.admins.find_by_email(email).await?.is_some() {
                return Err(BotError::Conflict(format!("Email {} sudah digunakan", email)));
            }
        }

        let record = AdminRecord {
            username,
            email,
            role: request.role.as_str(),
            is_active: request.is_active,
        };
        let admin = self.db.admins.create(&record, &hash_password(&request.password)?).await?;
        Ok(AdminProfile::from(admin))
    }

    /// Edit another operator account; an empty password keeps the current one
    pub async fn update(&self, actor: &AdminActor, id: i64, request: &UpdateAdminRequest) -> Result<AdminProfile> {
        ensure_not_self(actor, id, "mengubah")?;
        let existing = self
            .db
            .admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| BotError::not_found("Admin", id))?;

        let username = request.username.trim();
        if username.is_empty() {
            return Err(BotError::InvalidInput("Username harus diisi".to_string()));
        }
        if username != existing.username && self.db.admins.find_by_username(username).await?.is_some() {
            return Err(BotError::Conflict(format!("Username {} sudah digunakan", username)));
        }

        let email = normalized_email(request.email.as_deref())?;
        if let Some(email) = email {
            if let Some(other) = self.db.admins.find_by_email(email).await? {
                if other.id != id {
                    return Err(BotError::Conflict(format!("Email {} sudah digunakan", email)));
                }
            }
        }

        let password_hash = match request.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => {
                self.auth.check_new_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let record = AdminRecord {
            username,
            email,
            role: request.role.as_str(),
            is_active: request.is_active,
        };
        let admin = self
            .db
            .admins
            .update(id, &record, password_hash.as_deref())
            .await?
            .ok_or_else(|| BotError::not_found("Admin", id))?;

        self.db
            .log_activity(actor.activity("update_admin", Some(("admin", id)), format!("Mengubah admin {}", admin.username)))
            .await;

        Ok(AdminProfile::from(admin))
    }

    /// Delete another operator; super admins cannot be deleted
    pub async fn delete(&self, actor: &AdminActor, id: i64) -> Result<()> {
        ensure_not_self(actor, id, "menghapus")?;
        let admin = self
            .db
            .admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| BotError::not_found("Admin", id))?;

        if admin.is_super_admin() {
            return Err(BotError::PermissionDenied("Super admin tidak dapat dihapus".to_string()));
        }

        self.db.admins.delete(id).await?;
        self.db
            .log_activity(actor.activity("delete_admin", Some(("admin", id)), format!("Menghapus admin {}", admin.username)))
            .await;
        info!(admin_id = actor.id(), target = id, "Admin account deleted");

        Ok(())
    }

    /// Activate or deactivate another operator
    pub async fn toggle_status(&self, actor: &AdminActor, id: i64) -> Result<AdminProfile> {
        ensure_not_self(actor, id, "menonaktifkan")?;
        let existing = self
            .db
            .admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| BotError::not_found("Admin", id))?;

        let admin = self
            .db
            .admins
            .set_active(id, !existing.is_active)
            .await?
            .ok_or_else(|| BotError::not_found("Admin", id))?;

        let verb = if admin.is_active { "Mengaktifkan" } else { "Menonaktifkan" };
        self.db
            .log_activity(actor.activity("toggle_admin", Some(("admin", id)), format!("{} admin {}", verb, admin.username)))
            .await;

        Ok(AdminProfile::from(admin))
    }

    pub async fn activity(&self, page: Option<i64>) -> Result<Page<ActivityLog>> {
        let pagination = Pagination::new(page, ACTIVITY_PER_PAGE);
        let logs = self.db.admins.list_activity(pagination).await?;
        let total = self.db.admins.count_activity().await?;
        Ok(Page::new(logs, pagination, total))
    }

    /// Update the caller's own email
    pub async fn update_profile(&self, actor: &AdminActor, request: &UpdateProfileRequest) -> Result<AdminProfile> {
        let email = normalized_email(request.email.as_deref())?;
        if let Some(email) = email {
            if let Some(other) = self.db.admins.find_by_email(email).await? {
                if other.id != actor.id() {
                    return Err(BotError::Conflict(format!("Email {} sudah digunakan", email)));
                }
            }
        }

        let admin = self
            .db
            .admins
            .update_email(actor.id(), email)
            .await?
            .ok_or_else(|| BotError::not_found("Admin", actor.id()))?;

        self.db
            .log_activity(actor.activity("update_profile", Some(("admin", actor.id())), "Mengubah profil"))
            .await;

        Ok(AdminProfile::from(admin))
    }

    pub async fn app_settings(&self) -> Result<Vec<AppSetting>> {
        self.db.settings.list().await
    }

    pub async fn update_app_setting(&self, actor: &AdminActor, key: &str, request: &UpdateSettingRequest) -> Result<AppSetting> {
        let key = key.trim();
        if key.is_empty() {
            return Err(BotError::InvalidInput("Key setting harus diisi".to_string()));
        }

        let value = request.value.as_deref().map(str::trim);
        let setting = self.db.settings.upsert(key, value, request.description.as_deref()).await?;

        self.db
            .log_activity(actor.activity("update_setting", Some(("setting", setting.id)), format!("Mengubah setting {}", key)))
            .await;

        Ok(setting)
    }
}

fn ensure_not_self(actor: &AdminActor, id: i64, verb: &str) -> Result<()> {
    if actor.id() == id {
        return Err(BotError::PermissionDenied(format!("Tidak dapat {} akun sendiri", verb)));
    }
    Ok(())
}

/// Blank emails become `None`; anything else must look like an address
fn normalized_email(email: Option<&str>) -> Result<Option<&str>> {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) if !is_valid_email(email) => Err(BotError::InvalidInput(format!("Email {} tidak valid", email))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminUser;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn actor(id: i64) -> AdminActor {
        AdminActor {
            admin: AdminUser {
                id,
                username: "root".to_string(),
                email: None,
                password_hash: String::new(),
                role: "super_admin".to_string(),
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                last_login: None,
            },
            ip_address: None,
            user_agent: None,
        }
    }

    #[test]
    fn test_cannot_target_self() {
        assert_matches!(ensure_not_self(&actor(1), 1, "menghapus"), Err(BotError::PermissionDenied(_)));
        assert!(ensure_not_self(&actor(1), 2, "menghapus").is_ok());
    }

    #[test]
    fn test_normalized_email() {
        assert_eq!(normalized_email(None).unwrap(), None);
        assert_eq!(normalized_email(Some("  ")).unwrap(), None);
        assert_eq!(normalized_email(Some(" ptsp@kemenag.go.id ")).unwrap(), Some("ptsp@kemenag.go.id"));
        assert_matches!(normalized_email(Some("bukan-email")), Err(BotError::InvalidInput(_)));
    }
}
