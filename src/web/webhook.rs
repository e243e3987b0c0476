//! WhatsApp webhook endpoints

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error, info, warn};
use crate::whatsapp::{VerifyQuery, WebhookPayload};
use super::AppState;

/// Subscription handshake.
///
/// Endpoint: `GET /webhook?hub.mode=subscribe&hub.verify_token=..&hub.challenge=..`
///
/// Response codes:
/// - 200 with the challenge as body
/// - 403 when the mode or token does not match
pub async fn verify(State(state): State<AppState>, Query(query): Query<VerifyQuery>) -> Response {
    match query.accept(&state.settings.whatsapp.verify_token) {
        Some(challenge) => {
            info!("Webhook verified");
            (StatusCode::OK, challenge.to_string()).into_response()
        }
        None => {
            warn!(mode = ?query.mode, "Webhook verification failed");
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        }
    }
}

/// Message delivery.
///
/// Endpoint: `POST /webhook`
///
/// Response codes:
/// - 200 `{"status":"success"}` after the messages are handled
/// - 200 `{"status":"ignored"}` for objects other than WhatsApp accounts
/// - 500 `{"status":"error"}` when the body is not valid JSON or the database fails
pub async fn receive(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Unparseable webhook body");
            return error_response(&e.to_string());
        }
    };

    if !payload.is_whatsapp() {
        debug!(object = %payload.object, "Ignoring webhook object");
        return Json(json!({ "status": "ignored" })).into_response();
    }

    match state.services.bot_service.handle_webhook(&payload).await {
        Ok(outcome) => {
            debug!(
                handled = outcome.handled,
                duplicates = outcome.duplicates,
                failed = outcome.failed,
                status_updates = outcome.status_updates,
                "Webhook processed"
            );
            Json(json!({ "status": "success" })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Webhook processing failed");
            error_response(&e.public_message())
        }
    }
}

fn error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}
