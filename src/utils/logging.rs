//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the PTSP bot.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::{LoggingConfig, Settings};
use crate::utils::errors::{BotError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file appender and must be held until exit.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| BotError::Config(format!("Invalid log filter: {}", e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "ptsp-bot.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BotError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Install logging, then validate the settings so validation warnings are recorded
pub fn init_and_validate(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let guard = init_logging(&settings.logging)?;
    settings.validate()?;
    Ok(guard)
}

/// Log an incoming WhatsApp interaction
pub fn log_user_action(phone: &str, action: &str, details: Option<&str>) {
    info!(
        phone = phone,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log an admin activity that was written to the activity log
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    info!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action recorded"
    );
}

/// Log a failed call to an external API
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    warn!(
        api = api,
        error = error,
        context = context,
        "External API call failed"
    );
}
