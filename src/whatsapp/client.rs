//! WhatsApp Business Cloud API client
//!
//! One HTTP attempt per message; failures are reported to the caller, which
//! logs them against the conversation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::config::WhatsAppConfig;
use crate::utils::errors::{BotError, Result, WhatsAppError, WhatsAppResult};
use super::message::OutgoingMessage;

#[derive(Serialize)]
struct SendRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(flatten)]
    message: &'a OutgoingMessage,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

/// Sends messages through the Cloud API `messages` endpoint
#[derive(Clone, Debug)]
pub struct WhatsAppClient {
    http_client: reqwest::Client,
    endpoint: String,
    token: String,
    configured: bool,
}

impl WhatsAppClient {
    pub fn new(config: &WhatsAppConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ptsp-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: messages_endpoint(config),
            token: config.token.clone(),
            configured: !config.token.is_empty() && !config.phone_number_id.is_empty(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Send one message and return the provider message id
    pub async fn send(&self, to: &str, message: &OutgoingMessage) -> Result<String> {
        if !self.configured {
            warn!("WhatsApp token or phone number ID missing, message not sent");
            return Err(WhatsAppError::NotConfigured.into());
        }

        let request = SendRequest {
            messaging_product: "whatsapp",
            to,
            message,
        };

        debug!(phone = %to, message_type = message.message_type(), "Sending WhatsApp message");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(WhatsAppError::RequestFailed {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let message_id = parse_send_response(&body)?;
        info!(phone = %to, message_id = %message_id, "WhatsApp message sent");
        Ok(message_id)
    }
}

/// `{api_base_url}/{api_version}/{phone_number_id}/messages`
fn messages_endpoint(config: &WhatsAppConfig) -> String {
    format!(
        "{}/{}/{}/messages",
        config.api_base_url.trim_end_matches('/'),
        config.api_version.trim_matches('/'),
        config.phone_number_id
    )
}

fn map_transport_error(error: reqwest::Error) -> BotError {
    if error.is_timeout() {
        WhatsAppError::Timeout.into()
    } else {
        BotError::Http(error)
    }
}

/// Provider message id (`messages[0].id`) of a successful send
fn parse_send_response(body: &str) -> WhatsAppResult<String> {
    let response: SendResponse = serde_json::from_str(body)
        .map_err(|e| WhatsAppError::InvalidResponse(e.to_string()))?;

    response
        .messages
        .into_iter()
        .next()
        .map(|message| message.id)
        .ok_or_else(|| WhatsAppError::InvalidResponse("response carries no message id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> WhatsAppConfig {
        WhatsAppConfig {
            token: "token".to_string(),
            phone_number_id: "12345".to_string(),
            verify_token: "verify".to_string(),
            api_base_url: "https://graph.facebook.com/".to_string(),
            api_version: "v21.0".to_string(),
            timeout_seconds: 10,
        }
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(messages_endpoint(&config()), "https://graph.facebook.com/v21.0/12345/messages");
    }

    #[test]
    fn test_request_body_is_flat() {
        let message = OutgoingMessage::text("halo");
        let request = SendRequest { messaging_product: "whatsapp", to: "6281234", message: &message };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "6281234",
                "type": "text",
                "text": { "body": "halo" }
            })
        );
    }

    #[test]
    fn test_parse_send_response() {
        let body = r#"{"messaging_product":"whatsapp","contacts":[{"input":"6281234","wa_id":"6281234"}],"messages":[{"id":"wamid.OUT"}]}"#;
        assert_eq!(parse_send_response(body).unwrap(), "wamid.OUT");
        assert_matches!(parse_send_response(r#"{"messages":[]}"#), Err(WhatsAppError::InvalidResponse(_)));
        assert_matches!(parse_send_response("not json"), Err(WhatsAppError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_client_does_not_send() {
        let mut config = config();
        config.token.clear();
        let client = WhatsAppClient::new(&config).unwrap();
        assert!(!client.is_configured());

        let result = client.send("6281234", &OutgoingMessage::text("halo")).await;
        assert_matches!(result, Err(BotError::WhatsApp(WhatsAppError::NotConfigured)));
    }
}
