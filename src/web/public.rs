//! Unauthenticated endpoints besides the webhook

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use crate::services::SendOutcome;
use crate::utils::errors::{BotError, Result};
use crate::utils::helpers::normalize_phone;
use super::AppState;

pub const SERVICE_NAME: &str = "PTSP WhatsApp Bot";
/// Width of `users.phone_number`
pub const MAX_PHONE_DIGITS: usize = 20;

/// Liveness and catalog summary.
///
/// Endpoint: `GET /health`
///
/// Always 200; `database` is `"disconnected"` when the pool is unreachable.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db = &state.services.db;
    let healthy = state.services.health_check().await.is_healthy();

    let (categories, total_services) = if healthy {
        (
            db.catalog.count_active_kategori().await.unwrap_or(0),
            db.catalog.count_active_layanan().await.unwrap_or(0),
        )
    } else {
        (0, 0)
    };

    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now(),
        "database": if healthy { "connected" } else { "disconnected" },
        "database_type": "PostgreSQL",
        "categories": categories,
        "total_services": total_services,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SendTestRequest {
    pub to: Option<String>,
}

/// Send the main menu to a number.
///
/// Endpoint: `POST /send-test`
///
/// Response codes:
/// - 200 with the provider message id
/// - 400 when `to` is missing or longer than 20 digits
/// - 500 when the send fails
pub async fn send_test(State(state): State<AppState>, Json(request): Json<SendTestRequest>) -> Result<Response> {
    let phone = request
        .to
        .as_deref()
        .map(normalize_phone)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| BotError::InvalidInput("Nomor tujuan (to) harus diisi".to_string()))?;
    if phone.len() > MAX_PHONE_DIGITS {
        return Err(BotError::InvalidInput(format!(
            "Nomor tujuan maksimal {} digit",
            MAX_PHONE_DIGITS
        )));
    }

    match state.services.bot_service.send_test(&phone).await? {
        SendOutcome::Sent { message_id } => {
            info!(phone = %phone, message_id = %message_id, "Test message sent");
            Ok(Json(json!({ "status": "sent", "to": phone, "message_id": message_id })).into_response())
        }
        SendOutcome::Failed { error } => {
            warn!(phone = %phone, error = %error, "Test message failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "failed", "to": phone, "error": error })),
            )
                .into_response())
        }
    }
}
