//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub bot: BotConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// WhatsApp Business Cloud API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhatsAppConfig {
    pub token: String,
    pub phone_number_id: String,
    pub verify_token: String,
    pub api_base_url: String,
    pub api_version: String,
    pub timeout_seconds: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Admin API authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    /// HMAC secret for session tokens. Generated at startup when empty.
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub remember_ttl_days: i64,
    pub login_attempts_per_minute: u32,
    pub min_password_length: usize,
}

/// Bot conversation texts and behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub office_name: String,
    pub footer: String,
    pub greeting_keywords: Vec<String>,
    pub contact_number: String,
    pub contact_message: String,
    pub followup_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("PTSP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.greeting_keywords")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply_conventional_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply the conventional deployment variables (`WHATSAPP_TOKEN`,
    /// `DATABASE_URL`, ...) on top of the layered configuration.
    pub fn apply_conventional_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("WHATSAPP_TOKEN") {
            self.whatsapp.token = token;
        }
        if let Some(phone_number_id) = lookup("PHONE_NUMBER_ID") {
            self.whatsapp.phone_number_id = phone_number_id;
        }
        if let Some(verify_token) = lookup("VERIFY_TOKEN") {
            self.whatsapp.verify_token = verify_token;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(secret) = lookup("SECRET_KEY") {
            self.admin.session_secret = secret;
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::BotError> {
        super::validation::validate_settings(self)
    }

    /// Whether outbound messaging credentials are present
    pub fn whatsapp_configured(&self) -> bool {
        !self.whatsapp.token.is_empty() && !self.whatsapp.phone_number_id.is_empty()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            whatsapp: WhatsAppConfig {
                token: String::new(),
                phone_number_id: String::new(),
                verify_token: "your_verify_token_123".to_string(),
                api_base_url: "https://graph.facebook.com".to_string(),
                api_version: "v21.0".to_string(),
                timeout_seconds: 10,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/ptsp_bot".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            admin: AdminConfig {
                session_secret: String::new(),
                session_ttl_hours: 12,
                remember_ttl_days: 30,
                login_attempts_per_minute: 5,
                min_password_length: 8,
            },
            bot: BotConfig {
                office_name: "Kemenag Kab. Madiun".to_string(),
                footer: "PTSP Kemenag Kab. Madiun".to_string(),
                greeting_keywords: ["halo", "hi", "menu", "mulai", "start"]
                    .iter()
                    .map(|k| k.to_string())
                    .collect(),
                contact_number: "6282245552687".to_string(),
                contact_message: "Assalamualaikum, saya butuh bantuan".to_string(),
                followup_delay_ms: 1000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                json: false,
            },
        }
    }
}
