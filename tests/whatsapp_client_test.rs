//! WhatsApp Cloud API client against a mock server

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use ptsp_bot::utils::errors::{BotError, WhatsAppError};
use ptsp_bot::whatsapp::{OutgoingMessage, WhatsAppClient};
use std::time::Duration;

#[tokio::test]
async fn test_send_text_returns_provider_id() {
    let mock = WhatsAppMockServer::new().await;
    mock.mock_send_success().await;

    let client = WhatsAppClient::new(&mock.config()).unwrap();
    let message_id = client
        .send(TEST_PHONE, &OutgoingMessage::text("Halo"))
        .await
        .unwrap();
    assert!(message_id.starts_with("wamid."));

    let sent = mock.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["messaging_product"], "whatsapp");
    assert_eq!(sent[0]["to"], TEST_PHONE);
    assert_eq!(sent[0]["type"], "text");
    assert_eq!(sent[0]["text"]["body"], "Halo");
}

#[tokio::test]
async fn test_http_error_is_reported_with_status() {
    let mock = WhatsAppMockServer::new().await;
    mock.mock_send_error(401).await;

    let client = WhatsAppClient::new(&mock.config()).unwrap();
    let result = client.send(TEST_PHONE, &OutgoingMessage::text("Halo")).await;

    assert_matches!(
        result,
        Err(BotError::WhatsApp(WhatsAppError::RequestFailed { status: 401, body })) if body.contains("OAuthException")
    );
}

#[tokio::test]
async fn test_timeout() {
    let mock = WhatsAppMockServer::new().await;
    mock.mock_send_slow(Duration::from_secs(5)).await;

    let mut config = mock.config();
    config.timeout_seconds = 1;
    let client = WhatsAppClient::new(&config).unwrap();

    let result = client.send(TEST_PHONE, &OutgoingMessage::text("Halo")).await;
    assert_matches!(result, Err(BotError::WhatsApp(WhatsAppError::Timeout)));
}

#[tokio::test]
async fn test_unconfigured_client_makes_no_request() {
    let mock = WhatsAppMockServer::new().await;
    mock.mock_send_success().await;

    let mut config = mock.config();
    config.token = String::new();
    let client = WhatsAppClient::new(&config).unwrap();
    assert!(!client.is_configured());

    let result = client.send(TEST_PHONE, &OutgoingMessage::text("Halo")).await;
    assert_matches!(result, Err(BotError::WhatsApp(WhatsAppError::NotConfigured)));
    assert!(mock.sent_messages().await.is_empty());
}
