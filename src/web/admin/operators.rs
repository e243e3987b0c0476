//! Operator management under `/admin/super-admin`, super admins only

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::middleware::SuperAdminSession;
use crate::models::{ActivityLog, AdminProfile, CreateAdminRequest, UpdateAdminRequest};
use crate::utils::errors::Result;
use crate::utils::pagination::Page;
use crate::web::AppState;
use super::monitoring::SearchQuery;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Endpoint: `GET /admin/super-admin/admins?page&search`
pub async fn list_admins(
    State(state): State<AppState>,
    SuperAdminSession(_): SuperAdminSession,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<AdminProfile>>> {
    let page = state
        .services
        .admin_service
        .list(query.search.as_deref(), query.page)
        .await?;
    Ok(Json(page))
}

/// Create an operator account.
///
/// Endpoint: `POST /admin/super-admin/admins`
///
/// Response codes:
/// - 201 with the profile
/// - 400 on a missing username, short password or invalid email
/// - 409 when the username or email is taken
pub async fn create_admin(
    State(state): State<AppState>,
    SuperAdminSession(actor): SuperAdminSession,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminProfile>)> {
    let admin = state.services.admin_service.create(&actor, &request).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

/// Endpoint: `PUT /admin/super-admin/admins/:id`
pub async fn update_admin(
    State(state): State<AppState>,
    SuperAdminSession(actor): SuperAdminSession,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAdminRequest>,
) -> Result<Json<AdminProfile>> {
    Ok(Json(state.services.admin_service.update(&actor, id, &request).await?))
}

/// Delete an operator.
///
/// Endpoint: `DELETE /admin/super-admin/admins/:id`
///
/// Response codes:
/// - 200 when deleted
/// - 403 for the caller's own account or a super admin
/// - 404 when missing
pub async fn delete_admin(
    State(state): State<AppState>,
    SuperAdminSession(actor): SuperAdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.services.admin_service.delete(&actor, id).await?;
    Ok(Json(json!({ "status": "deleted", "id": id })))
}

/// Endpoint: `POST /admin/super-admin/admins/:id/toggle-status`
pub async fn toggle_admin(
    State(state): State<AppState>,
    SuperAdminSession(actor): SuperAdminSession,
    Path(id): Path<i64>,
) -> Result<Json<AdminProfile>> {
    Ok(Json(state.services.admin_service.toggle_status(&actor, id).await?))
}

/// Endpoint: `GET /admin/super-admin/activity?page`
pub async fn activity(
    State(state): State<AppState>,
    SuperAdminSession(_): SuperAdminSession,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ActivityLog>>> {
    Ok(Json(state.services.admin_service.activity(query.page).await?))
}
