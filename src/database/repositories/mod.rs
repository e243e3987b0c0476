//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod message;
pub mod catalog;
pub mod admin;
pub mod settings;

// Re-export repositories
pub use user::UserRepository;
pub use message::MessageRepository;
pub use catalog::{CatalogRepository, ActiveLayanan};
pub use admin::{AdminRepository, AdminRecord};
pub use settings::SettingsRepository;
