//! Admin operator, activity log and application setting models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::utils::helpers::truncate_chars;

/// Column widths of `admin_activity_logs`
pub const MAX_ACTIVITY_IP: usize = 50;
pub const MAX_ACTIVITY_USER_AGENT: usize = 200;

/// Operator account stored in the database (includes the password hash)
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl AdminUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin.as_str()
    }
}

/// Operator account as exposed by the API (without the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<AdminUser> for AdminProfile {
    fn from(admin: AdminUser) -> Self {
        let is_super_admin = admin.is_super_admin();
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            role: admin.role,
            is_active: admin.is_active,
            is_super_admin,
            created_at: admin.created_at,
            last_login: admin.last_login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "super_admin" => Some(AdminRole::SuperAdmin),
            "admin" => Some(AdminRole::Admin),
            _ => None,
        }
    }
}

impl Default for AdminRole {
    fn default() -> Self {
        AdminRole::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Operator edit; an empty or missing password keeps the current one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAdminRequest {
    pub username: String,
    pub password: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: i64,
    pub admin_id: Option<i64>,
    pub admin_username: Option<String>,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateActivityRequest {
    pub admin_id: i64,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Authenticated operator plus the request details recorded in the activity log
#[derive(Debug, Clone)]
pub struct AdminActor {
    pub admin: AdminUser,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AdminActor {
    pub fn id(&self) -> i64 {
        self.admin.id
    }

    /// Activity entry attributed to this operator
    pub fn activity(&self, action: &str, target: Option<(&str, i64)>, description: impl Into<String>) -> CreateActivityRequest {
        CreateActivityRequest {
            admin_id: self.admin.id,
            action: action.to_string(),
            target_type: target.map(|(kind, _)| kind.to_string()),
            target_id: target.map(|(_, id)| id),
            description: Some(description.into()),
            ip_address: self.ip_address.as_deref().map(|ip| truncate_chars(ip, MAX_ACTIVITY_IP).to_string()),
            user_agent: self
                .user_agent
                .as_deref()
                .map(|agent| truncate_chars(agent, MAX_ACTIVITY_USER_AGENT).to_string()),
        }
    }
}

/// Key/value setting editable from the admin API
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppSetting {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Setting key holding the tutorial video link shown with service details
pub const SETTING_VIDEO_LINK: &str = "link_video_youtube";

fn default_active() -> bool {
    true
}
