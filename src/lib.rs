//! PTSP WhatsApp Bot
//!
//! A WhatsApp bot that answers questions about the services of a PTSP
//! (one-stop integrated service desk): categories, requirements, SOP steps,
//! processing times and fees. The library provides the webhook dispatch,
//! the WhatsApp Cloud API client, the PostgreSQL catalog and message log, and
//! a JSON admin API to manage all of it.

pub mod bot;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
pub mod web;
pub mod whatsapp;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BotError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use web::{build_router, AppState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
