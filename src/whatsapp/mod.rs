//! WhatsApp Business Cloud API integration
//!
//! Inbound webhook payloads, outgoing message payloads and the HTTP client.

pub mod client;
pub mod message;
pub mod webhook;

pub use client::WhatsAppClient;
pub use message::{OutgoingMessage, Interactive, Header, BodyText, ListAction, Section, Row, ButtonAction, Button};
pub use webhook::{WebhookPayload, ChangeValue, InboundMessage, VerifyQuery};
