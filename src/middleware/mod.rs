//! Middleware module
//!
//! This module contains request extractors and layers shared by the HTTP routes

pub mod auth;
pub mod logging;
pub mod rate_limit;

// Re-export commonly used middleware
pub use auth::{AdminSession, SuperAdminSession};
pub use logging::request_logging;
pub use rate_limit::LoginRateLimiter;
