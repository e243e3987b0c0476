//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod message;
pub mod catalog;
pub mod admin;

// Re-export commonly used models
pub use user::{User, UserSession, SessionUpdate};
pub use message::{Message, MessageWithUser, CreateMessageRequest, Direction, MessageStatus, MessageFilter};
pub use catalog::{Kategori, KategoriSummary, Layanan, Persyaratan, Sop, LayananDetail, CreateKategoriRequest, UpdateKategoriRequest, LayananForm, LayananFilter, CatalogImport, ImportKategori, ImportLayanan, ImportSummary, next_layanan_id};
pub use admin::{AdminUser, AdminActor, AdminProfile, AdminRole, CreateAdminRequest, UpdateAdminRequest, ActivityLog, CreateActivityRequest, AppSetting, SETTING_VIDEO_LINK};
