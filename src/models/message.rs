//! Message log model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub message_id: String,
    pub user_id: i64,
    pub direction: String,
    pub message_type: Option<String>,
    pub content: Option<String>,
    pub response_to: Option<String>,
    pub service_type: Option<String>,
    pub layanan_id: Option<i64>,
    pub status: String,
    pub error_message: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A message log row joined with the sender's phone number
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageWithUser {
    pub id: i64,
    pub message_id: String,
    pub user_id: i64,
    pub phone_number: String,
    pub direction: String,
    pub message_type: Option<String>,
    pub content: Option<String>,
    pub service_type: Option<String>,
    pub status: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "incoming" => Some(Direction::Incoming),
            "outgoing" => Some(Direction::Outgoing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Received,
    Sent,
    Viewed,
    Failed,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Received => "received",
            MessageStatus::Sent => "sent",
            MessageStatus::Viewed => "viewed",
            MessageStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateMessageRequest {
    pub message_id: String,
    pub user_id: i64,
    pub direction: Direction,
    pub message_type: Option<String>,
    pub content: Option<String>,
    pub response_to: Option<String>,
    pub service_type: Option<String>,
    pub layanan_id: Option<i64>,
    pub status: MessageStatus,
    pub error_message: Option<String>,
}

impl CreateMessageRequest {
    pub fn new(message_id: impl Into<String>, user_id: i64, direction: Direction, status: MessageStatus) -> Self {
        Self {
            message_id: message_id.into(),
            user_id,
            direction,
            message_type: None,
            content: None,
            response_to: None,
            service_type: None,
            layanan_id: None,
            status,
            error_message: None,
        }
    }
}

/// Filters of the admin message listing
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub direction: Option<Direction>,
    pub message_type: Option<String>,
    pub date: Option<chrono::NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_round_trip() {
        assert_eq!(Direction::parse("incoming"), Some(Direction::Incoming));
        assert_eq!(Direction::parse(Direction::Outgoing.as_str()), Some(Direction::Outgoing));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test]
    fn test_new_request_defaults() {
        let req = CreateMessageRequest::new("wamid.1", 3, Direction::Incoming, MessageStatus::Received);
        assert_eq!(req.status.as_str(), "received");
        assert!(req.layanan_id.is_none());
        assert!(req.content.is_none());
    }
}
