//! Mock WhatsApp Cloud API server for testing
//!
//! A wiremock server standing in for `graph.facebook.com`. Sent messages can
//! be inspected afterwards through [`WhatsAppMockServer::sent_messages`].

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, Respond, ResponseTemplate,
};
use ptsp_bot::config::{Settings, WhatsAppConfig};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_PHONE_NUMBER_ID: &str = "1234567890";
pub const TEST_API_VERSION: &str = "v21.0";

pub struct WhatsAppMockServer {
    pub server: MockServer,
}

impl WhatsAppMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Client configuration pointing at this server
    pub fn config(&self) -> WhatsAppConfig {
        WhatsAppConfig {
            token: TEST_TOKEN.to_string(),
            phone_number_id: TEST_PHONE_NUMBER_ID.to_string(),
            verify_token: "verify-me".to_string(),
            api_base_url: self.server.uri(),
            api_version: TEST_API_VERSION.to_string(),
            timeout_seconds: 2,
        }
    }

    /// Settings whose WhatsApp section points at this server
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.whatsapp = self.config();
        settings.admin.session_secret = "integration-test-secret".to_string();
        settings.bot.followup_delay_ms = 0;
        settings
    }

    fn messages_path() -> String {
        format!("/{}/{}/messages", TEST_API_VERSION, TEST_PHONE_NUMBER_ID)
    }

    /// Accept every send, each with a new message id
    pub async fn mock_send_success(&self) {
        Mock::given(method("POST"))
            .and(path(Self::messages_path()))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .respond_with(SentResponder)
            .mount(&self.server)
            .await;
    }

    /// Reject every send like the Graph API does for a bad token
    pub async fn mock_send_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(Self::messages_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": "Invalid OAuth access token.",
                    "type": "OAuthException",
                    "code": 190
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer slower than the client timeout
    pub async fn mock_send_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(Self::messages_path()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "messages": [{ "id": "wamid.SLOW" }] }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Bodies of every message POSTed so far, in order
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}

/// Successful send response with a unique `wamid`
struct SentResponder;

impl Respond for SentResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let to = serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body["to"].as_str().map(str::to_string))
            .unwrap_or_default();

        ResponseTemplate::new(200).set_body_json(json!({
            "messaging_product": "whatsapp",
            "contacts": [{ "input": to, "wa_id": to }],
            "messages": [{ "id": format!("wamid.{}", uuid::Uuid::new_v4().simple()) }]
        }))
    }
}
