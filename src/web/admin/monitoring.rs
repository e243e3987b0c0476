//! Dashboard, user and message monitoring, analytics

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use crate::middleware::AdminSession;
use crate::models::{Direction, MessageFilter, MessageWithUser, User};
use crate::services::analytics::{Analytics, Dashboard, LiveStats, UserDetail};
use crate::utils::errors::Result;
use crate::utils::helpers::parse_date_filter;
use crate::utils::pagination::Page;
use crate::web::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

/// Raw message filters; values that do not parse are ignored
#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    pub page: Option<i64>,
    pub direction: Option<String>,
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub date: Option<String>,
}

impl MessagesQuery {
    pub fn filter(&self) -> MessageFilter {
        MessageFilter {
            direction: self.direction.as_deref().and_then(Direction::parse),
            message_type: self
                .message_type
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            date: self.date.as_deref().and_then(parse_date_filter),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<u32>,
}

/// Endpoint: `GET /admin/dashboard`
pub async fn dashboard(State(state): State<AppState>, AdminSession(_): AdminSession) -> Result<Json<Dashboard>> {
    Ok(Json(state.services.analytics_service.dashboard().await?))
}

/// Endpoint: `GET /admin/users?page&search`
pub async fn users(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<User>>> {
    let page = state
        .services
        .analytics_service
        .users(query.search.as_deref(), query.page)
        .await?;
    Ok(Json(page))
}

/// User with recent history and menu session.
///
/// Endpoint: `GET /admin/users/:id`
///
/// Response codes:
/// - 200 with user, messages and session
/// - 404 when the user does not exist
pub async fn user_detail(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<UserDetail>> {
    Ok(Json(state.services.analytics_service.user_detail(id).await?))
}

/// Endpoint: `GET /admin/messages?page&direction&type&date`
pub async fn messages(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Page<MessageWithUser>>> {
    let page = state
        .services
        .analytics_service
        .messages(&query.filter(), query.page)
        .await?;
    Ok(Json(page))
}

/// Endpoint: `GET /admin/analytics?days=30`
pub async fn analytics(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Analytics>> {
    Ok(Json(state.services.analytics_service.analytics(query.days).await?))
}

/// Counters polled by the live dashboard.
///
/// Endpoint: `GET /admin/api/stats`
pub async fn live_stats(State(state): State<AppState>, AdminSession(_): AdminSession) -> Result<Json<LiveStats>> {
    Ok(Json(state.services.analytics_service.live_stats().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_message_filter_parsing() {
        let query = MessagesQuery {
            page: Some(2),
            direction: Some("incoming".to_string()),
            message_type: Some("interactive".to_string()),
            date: Some("2024-05-17".to_string()),
        };
        let filter = query.filter();
        assert_eq!(filter.direction, Some(Direction::Incoming));
        assert_eq!(filter.message_type.as_deref(), Some("interactive"));
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2024, 5, 17));
    }

    #[test]
    fn test_unparseable_filters_are_ignored() {
        let query = MessagesQuery {
            page: None,
            direction: Some("sideways".to_string()),
            message_type: Some("  ".to_string()),
            date: Some("17/05/2024".to_string()),
        };
        let filter = query.filter();
        assert!(filter.direction.is_none());
        assert!(filter.message_type.is_none());
        assert!(filter.date.is_none());
    }
}
