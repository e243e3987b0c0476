//! Message log repository implementation

use sqlx::PgPool;
use chrono::{DateTime, NaiveDate, Utc};
use crate::models::message::{Message, MessageWithUser, CreateMessageRequest, Direction, MessageFilter};
use crate::utils::errors::BotError;
use crate::utils::helpers::day_bounds;
use crate::utils::pagination::Pagination;

const MESSAGE_COLUMNS: &str = "id, message_id, user_id, direction, message_type, content, response_to, \
     service_type, layanan_id, status, error_message, sent_at, created_at";

const JOINED_COLUMNS: &str = "m.id, m.message_id, m.user_id, u.phone_number, m.direction, m.message_type, \
     m.content, m.service_type, m.status, m.sent_at";

// $1 direction, $2 message_type, $3/$4 day bounds
const FILTER_CLAUSE: &str = "($1::TEXT IS NULL OR m.direction = $1) \
     AND ($2::TEXT IS NULL OR m.message_type = $2) \
     AND ($3::TIMESTAMPTZ IS NULL OR (m.sent_at >= $3 AND m.sent_at < $4))";

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether a provider message id was already logged
    pub async fn exists(&self, message_id: &str) -> Result<bool, BotError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM messages WHERE message_id = $1)")
            .bind(message_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    /// Log a message
    pub async fn create(&self, request: CreateMessageRequest) -> Result<Message, BotError> {
        let message = sqlx::query_as::<_, Message>(&format!(
            r#"
            INSERT INTO messages (message_id, user_id, direction, message_type, content, response_to,
                                  service_type, layanan_id, status, error_message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        ))
        .bind(request.message_id)
        .bind(request.user_id)
        .bind(request.direction.as_str())
        .bind(request.message_type)
        .bind(request.content)
        .bind(request.response_to)
        .bind(request.service_type)
        .bind(request.layanan_id)
        .bind(request.status.as_str())
        .bind(request.error_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Filtered listing, newest first
    pub async fn list(&self, filter: &MessageFilter, pagination: Pagination) -> Result<Vec<MessageWithUser>, BotError> {
        let (start, end) = filter_bounds(filter);
        let messages = sqlx::query_as::<_, MessageWithUser>(&format!(
            r#"
            SELECT {} FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE {}
            ORDER BY m.sent_at DESC, m.id DESC
            LIMIT $5 OFFSET $6
            "#,
            JOINED_COLUMNS, FILTER_CLAUSE
        ))
        .bind(filter.direction.map(|d| d.as_str()))
        .bind(filter.message_type.as_deref())
        .bind(start)
        .bind(end)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Count messages matching a listing filter
    pub async fn count_matching(&self, filter: &MessageFilter) -> Result<i64, BotError> {
        let (start, end) = filter_bounds(filter);
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM messages m WHERE {}", FILTER_CLAUSE))
            .bind(filter.direction.map(|d| d.as_str()))
            .bind(filter.message_type.as_deref())
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Most recent messages across all users
    pub async fn recent(&self, limit: i64) -> Result<Vec<MessageWithUser>, BotError> {
        let messages = sqlx::query_as::<_, MessageWithUser>(&format!(
            r#"
            SELECT {} FROM messages m
            JOIN users u ON u.id = m.user_id
            ORDER BY m.sent_at DESC, m.id DESC
            LIMIT $1
            "#,
            JOINED_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Latest messages of one user
    pub async fn for_user(&self, user_id: i64, limit: i64) -> Result<Vec<Message>, BotError> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {} FROM messages WHERE user_id = $1 ORDER BY sent_at DESC, id DESC LIMIT $2",
            MESSAGE_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn count(&self) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count messages of one direction sent in `[start, end)`
    pub async fn count_between(&self, direction: Direction, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE direction = $1 AND sent_at >= $2 AND sent_at < $3"
        )
        .bind(direction.as_str())
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Message counts per UTC day and direction since `since`
    pub async fn daily_counts(&self, since: DateTime<Utc>) -> Result<Vec<(NaiveDate, String, i64)>, BotError> {
        let rows: Vec<(NaiveDate, String, i64)> = sqlx::query_as(
            r#"
            SELECT (sent_at AT TIME ZONE 'UTC')::DATE AS day, direction, COUNT(*)
            FROM messages
            WHERE sent_at >= $1
            GROUP BY day, direction
            "#
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Category codes ranked by how often their services were viewed
    pub async fn popular_service_types(&self, since: Option<DateTime<Utc>>, limit: Option<i64>) -> Result<Vec<(String, i64)>, BotError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT service_type, COUNT(*) AS total
            FROM messages
            WHERE service_type IS NOT NULL
              AND ($1::TIMESTAMPTZ IS NULL OR sent_at >= $1)
            GROUP BY service_type
            ORDER BY total DESC, service_type ASC
            LIMIT $2
            "#
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

fn filter_bounds(filter: &MessageFilter) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match filter.date.map(day_bounds) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_bounds_without_date() {
        assert_eq!(filter_bounds(&MessageFilter::default()), (None, None));
    }

    #[test]
    fn test_filter_bounds_cover_one_day() {
        let filter = MessageFilter {
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        let (start, end) = filter_bounds(&filter);
        let (start, end) = (start.unwrap(), end.unwrap());
        assert_eq!(end - start, chrono::Duration::days(1));
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
