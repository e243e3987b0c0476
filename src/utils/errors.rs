//! Error handling for the PTSP bot
//!
//! This module defines the main error type used throughout the application
//! and the mapping of errors onto HTTP responses at the request boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for the PTSP bot application
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("WhatsApp API error: {0}")]
    WhatsApp(#[from] WhatsAppError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// WhatsApp Cloud API specific errors
#[derive(Error, Debug)]
pub enum WhatsAppError {
    #[error("WhatsApp token or phone number ID is not configured")]
    NotConfigured,

    #[error("WhatsApp API request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("WhatsApp API timeout")]
    Timeout,

    #[error("Invalid WhatsApp response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for PTSP bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Result type alias for WhatsApp operations
pub type WhatsAppResult<T> = std::result::Result<T, WhatsAppError>;

impl BotError {
    /// Shorthand for a missing row
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        BotError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotError::Database(_) => ErrorSeverity::Critical,
            BotError::Migration(_) => ErrorSeverity::Critical,
            BotError::Config(_) => ErrorSeverity::Critical,
            BotError::PermissionDenied(_) => ErrorSeverity::Warning,
            BotError::Authentication(_) => ErrorSeverity::Warning,
            BotError::Token(_) => ErrorSeverity::Warning,
            BotError::RateLimitExceeded => ErrorSeverity::Warning,
            BotError::InvalidInput(_) => ErrorSeverity::Info,
            BotError::NotFound { .. } => ErrorSeverity::Info,
            BotError::Conflict(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status code reported to API clients
    pub fn status_code(&self) -> StatusCode {
        match self {
            BotError::NotFound { .. } => StatusCode::NOT_FOUND,
            BotError::Conflict(_) => StatusCode::CONFLICT,
            BotError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BotError::Serialization(_) => StatusCode::BAD_REQUEST,
            BotError::Authentication(_) | BotError::Token(_) => StatusCode::UNAUTHORIZED,
            BotError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            BotError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            BotError::WhatsApp(_) | BotError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable label used in JSON error bodies
    fn label(&self) -> &'static str {
        match self.status_code() {
            StatusCode::NOT_FOUND => "Not found",
            StatusCode::CONFLICT => "Conflict",
            StatusCode::BAD_REQUEST => "Bad request",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::TOO_MANY_REQUESTS => "Too many requests",
            StatusCode::BAD_GATEWAY => "Upstream error",
            _ => "Internal server error",
        }
    }

    /// Message safe to show to API clients
    pub fn public_message(&self) -> String {
        match self {
            BotError::Database(_)
            | BotError::Migration(_)
            | BotError::Io(_)
            | BotError::PasswordHash(_)
            | BotError::Config(_) => "Terjadi kesalahan pada server".to_string(),
            BotError::Token(_) => "Sesi tidak valid, silakan login kembali".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(error = %self, severity = %self.severity(), "Request failed");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(error = %self, "Request rejected");
            }
            ErrorSeverity::Info => {
                tracing::debug!(error = %self, "Request rejected");
            }
        }

        let body = json!({
            "error": self.label(),
            "message": self.public_message(),
        });
        (status, Json(body)).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(BotError::not_found("Layanan", 7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BotError::Conflict("kode".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(BotError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BotError::Authentication("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BotError::PermissionDenied("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BotError::RateLimitExceeded.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            BotError::WhatsApp(WhatsAppError::NotConfigured).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            BotError::Config("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = BotError::not_found("Kategori", "umum");
        assert_eq!(err.to_string(), "Kategori not found: umum");
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = BotError::Config("database password is wrong".into());
        assert!(!err.public_message().contains("password"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_into_response_status() {
        let response = BotError::Conflict("duplicate".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
