//! Citizen user and menu session models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A WhatsApp user who has talked to the bot
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub phone_number: String,
    pub name: Option<String>,
    pub first_interaction: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
    pub total_messages: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Last menu position of a user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSession {
    pub id: i64,
    pub user_id: i64,
    pub current_category: Option<String>,
    pub current_layanan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields to record on a session; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub category: Option<String>,
    pub layanan: Option<String>,
}

impl SessionUpdate {
    pub fn category(kode: impl Into<String>) -> Self {
        Self {
            category: Some(kode.into()),
            layanan: None,
        }
    }

    pub fn layanan(layanan_id: impl Into<String>) -> Self {
        Self {
            category: None,
            layanan: Some(layanan_id.into()),
        }
    }
}
