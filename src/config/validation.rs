//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use regex::Regex;
use tracing::warn;
use crate::utils::errors::{BotError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_whatsapp_config(&settings.whatsapp)?;
    validate_database_config(&settings.database)?;
    validate_admin_config(&settings.admin)?;
    validate_bot_config(&settings.bot)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate WhatsApp configuration
fn validate_whatsapp_config(config: &super::WhatsAppConfig) -> Result<()> {
    if config.verify_token.is_empty() {
        return Err(BotError::Config(
            "Webhook verify token is required".to_string()
        ));
    }

    if config.token.is_empty() || config.phone_number_id.is_empty() {
        warn!("WhatsApp token or phone number ID not set, outgoing messages will fail");
    }

    if url::Url::parse(&config.api_base_url).is_err() {
        return Err(BotError::Config(
            format!("Invalid WhatsApp API base URL: {}", config.api_base_url)
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(BotError::Config(
            "WhatsApp timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(BotError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(BotError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(BotError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate admin authentication configuration
fn validate_admin_config(config: &super::AdminConfig) -> Result<()> {
    if config.session_ttl_hours <= 0 || config.remember_ttl_days <= 0 {
        return Err(BotError::Config(
            "Session lifetimes must be positive".to_string()
        ));
    }

    if config.login_attempts_per_minute == 0 {
        return Err(BotError::Config(
            "Login attempts per minute must be greater than 0".to_string()
        ));
    }

    if config.min_password_length < 8 {
        return Err(BotError::Config(
            "Minimum password length cannot be lower than 8".to_string()
        ));
    }

    Ok(())
}

/// Validate bot texts and keywords
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.greeting_keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(BotError::Config(
            "At least one greeting keyword is required".to_string()
        ));
    }

    let digits = Regex::new(r"^[0-9]{6,15}$")
        .map_err(|e| BotError::Config(e.to_string()))?;
    if !digits.is_match(&config.contact_number) {
        return Err(BotError::Config(
            format!("Contact number must be digits in international format: {}", config.contact_number)
        ));
    }

    if config.office_name.is_empty() {
        return Err(BotError::Config(
            "Office name is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BotError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(BotError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejects_empty_verify_token() {
        let mut settings = Settings::default();
        settings.whatsapp.verify_token.clear();
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_pool_bounds() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));

        let mut settings = Settings::default();
        settings.database.max_connections = 0;
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }

    #[test]
    fn test_rejects_non_numeric_contact_number() {
        let mut settings = Settings::default();
        settings.bot.contact_number = "+62 822".to_string();
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }

    #[test]
    fn test_rejects_blank_keywords() {
        let mut settings = Settings::default();
        settings.bot.greeting_keywords = vec!["  ".to_string()];
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_rejects_weak_password_policy() {
        let mut settings = Settings::default();
        settings.admin.min_password_length = 4;
        assert_matches!(validate_settings(&settings), Err(BotError::Config(_)));
    }
}
