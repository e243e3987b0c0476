//! Dashboard, monitoring and analytics queries for the admin API

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use crate::database::DatabaseService;
use crate::models::{Direction, Message, MessageFilter, MessageWithUser, User, UserSession};
use crate::utils::errors::{BotError, Result};
use crate::utils::helpers::day_bounds;
use crate::utils::pagination::{Page, Pagination};

pub const USERS_PER_PAGE: i64 = 20;
pub const MESSAGES_PER_PAGE: i64 = 50;
const USER_HISTORY_LIMIT: i64 = 50;
const RECENT_MESSAGES: i64 = 10;
const DASHBOARD_DAYS: u32 = 7;
const TOP_SERVICES: i64 = 5;
const MAX_ANALYTICS_DAYS: u32 = 365;

/// Traffic of one UTC day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub incoming: i64,
    pub outgoing: i64,
    pub new_users: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCount {
    pub service_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_users: i64,
    pub total_messages: i64,
    pub total_kategori: i64,
    pub total_layanan: i64,
    pub today_incoming: i64,
    pub today_outgoing: i64,
    pub active_users_24h: i64,
    pub recent_messages: Vec<MessageWithUser>,
    pub popular_services: Vec<ServiceCount>,
    pub chart: Vec<DailyPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub days: u32,
    pub daily: Vec<DailyPoint>,
    pub popular_services: Vec<ServiceCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveStats {
    pub total_users: i64,
    pub total_messages: i64,
    pub today_incoming: i64,
    pub today_outgoing: i64,
    pub active_now: i64,
    pub timestamp: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub user: User,
    pub messages: Vec<Message>,
    pub session: Option<UserSession>,
}

#[derive(Clone, Debug)]
pub struct AnalyticsService {
    db: DatabaseService,
}

impl AnalyticsService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let now = Utc::now();
        let (today_start, today_end) = day_bounds(now.date_naive());

        let chart = self.daily_series(DASHBOARD_DAYS).await?;
        let popular = self
            .db
            .messages
            .popular_service_types(Some(now - Duration::days(DASHBOARD_DAYS as i64)), Some(TOP_SERVICES))
            .await?;

        Ok(Dashboard {
            total_users: self.db.users.count().await?,
            total_messages: self.db.messages.count().await?,
            total_kategori: self.db.catalog.count_active_kategori().await?,
            total_layanan: self.db.catalog.count_active_layanan().await?,
            today_incoming: self.db.messages.count_between(Direction::Incoming, today_start, today_end).await?,
            today_outgoing: self.db.messages.count_between(Direction::Outgoing, today_start, today_end).await?,
            active_users_24h: self.db.users.count_active_since(now - Duration::hours(24)).await?,
            recent_messages: self.db.messages.recent(RECENT_MESSAGES).await?,
            popular_services: service_counts(popular),
            chart,
        })
    }

    /// Per-day series of the last `days` days plus all-time category popularity
    pub async fn analytics(&self, days: Option<u32>) -> Result<Analytics> {
        let days = days.unwrap_or(30).clamp(1, MAX_ANALYTICS_DAYS);
        let daily = self.daily_series(days).await?;
        let popular = self.db.messages.popular_service_types(None, None).await?;

        Ok(Analytics {
            days,
            daily,
            popular_services: service_counts(popular),
        })
    }

    pub async fn live_stats(&self) -> Result<LiveStats> {
        let now = Utc::now();
        let (today_start, today_end) = day_bounds(now.date_naive());

        Ok(LiveStats {
            total_users: self.db.users.count().await?,
            total_messages: self.db.messages.count().await?,
            today_incoming: self.db.messages.count_between(Direction::Incoming, today_start, today_end).await?,
            today_outgoing: self.db.messages.count_between(Direction::Outgoing, today_start, today_end).await?,
            active_now: self.db.users.count_active_since(now - Duration::minutes(5)).await?,
            timestamp: now,
        })
    }

    pub async fn users(&self, search: Option<&str>, page: Option<i64>) -> Result<Page<User>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let pagination = Pagination::new(page, USERS_PER_PAGE);
        let users = self.db.users.list(search, pagination).await?;
        let total = self.db.users.count_matching(search).await?;
        Ok(Page::new(users, pagination, total))
    }

    pub async fn user_detail(&self, id: i64) -> Result<UserDetail> {
        let user = self
            .db
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| BotError::not_found("User", id))?;
        let messages = self.db.messages.for_user(id, USER_HISTORY_LIMIT).await?;
        let session = self.db.users.find_session(id).await?;

        Ok(UserDetail { user, messages, session })
    }

    pub async fn messages(&self, filter: &MessageFilter, page: Option<i64>) -> Result<Page<MessageWithUser>> {
        let pagination = Pagination::new(page, MESSAGES_PER_PAGE);
        let messages = self.db.messages.list(filter, pagination).await?;
        let total = self.db.messages.count_matching(filter).await?;
        Ok(Page::new(messages, pagination, total))
    }

    async fn daily_series(&self, days: u32) -> Result<Vec<DailyPoint>> {
        let today = Utc::now().date_naive();
        let first_day = today - Duration::days(days as i64 - 1);
        let (since, _) = day_bounds(first_day);

        let messages = self.db.messages.daily_counts(since).await?;
        let new_users = self.db.users.new_users_per_day(since).await?;
        Ok(fill_daily_series(first_day, days, &messages, &new_users))
    }
}

/// One point per day starting at `first_day`, zero where nothing happened
pub fn fill_daily_series(
    first_day: NaiveDate,
    days: u32,
    messages: &[(NaiveDate, String, i64)],
    new_users: &[(NaiveDate, i64)],
) -> Vec<DailyPoint> {
    let mut by_day: HashMap<NaiveDate, DailyPoint> = HashMap::new();

    for (date, direction, count) in messages {
        let point = by_day.entry(*date).or_insert_with(|| empty_point(*date));
        match Direction::parse(direction) {
            Some(Direction::Incoming) => point.incoming += count,
            Some(Direction::Outgoing) => point.outgoing += count,
            None => {}
        }
    }
    for (date, count) in new_users {
        by_day.entry(*date).or_insert_with(|| empty_point(*date)).new_users += count;
    }

    first_day
        .iter_days()
        .take(days as usize)
        .map(|date| by_day.get(&date).copied().unwrap_or_else(|| empty_point(date)))
        .collect()
}

fn empty_point(date: NaiveDate) -> DailyPoint {
    DailyPoint {
        date,
        incoming: 0,
        outgoing: 0,
        new_users: 0,
    }
}

fn service_counts(rows: Vec<(String, i64)>) -> Vec<ServiceCount> {
    rows.into_iter()
        .map(|(service_type, count)| ServiceCount { service_type, count })
        .collect()
}
