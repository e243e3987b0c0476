//! Login, logout, own profile and application settings

use axum::extract::{Path, State};
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use crate::middleware::auth::client_ip;
use crate::middleware::AdminSession;
use crate::models::{AdminProfile, AppSetting};
use crate::services::admin::{UpdateProfileRequest, UpdateSettingRequest};
use crate::services::auth::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::utils::errors::Result;
use crate::web::AppState;

/// Exchange credentials for a bearer token.
///
/// Endpoint: `POST /admin/login`
///
/// Response codes:
/// - 200 with token, expiry and profile
/// - 401 on wrong credentials, 403 for inactive accounts, 429 when rate limited
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = state
        .services
        .auth_service
        .login(&request, client_ip(&headers), user_agent)
        .await?;
    Ok(Json(response))
}

/// Endpoint: `POST /admin/logout`
pub async fn logout(State(state): State<AppState>, AdminSession(actor): AdminSession) -> Json<Value> {
    state.services.auth_service.logout(&actor).await;
    Json(json!({ "status": "ok", "message": "Anda telah logout" }))
}

/// Endpoint: `GET /admin/profile`
pub async fn profile(AdminSession(actor): AdminSession) -> Json<AdminProfile> {
    Json(AdminProfile::from(actor.admin))
}

/// Endpoint: `PUT /admin/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<AdminProfile>> {
    let profile = state.services.admin_service.update_profile(&actor, &request).await?;
    Ok(Json(profile))
}

/// Change the caller's password.
///
/// Endpoint: `POST /admin/settings/password`
///
/// Response codes:
/// - 200 on success
/// - 400 when the current password is wrong, the new one too short or the confirmation differs
pub async fn change_password(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<Value>> {
    state.services.auth_service.change_password(&actor, &request).await?;
    Ok(Json(json!({ "status": "ok", "message": "Password berhasil diubah" })))
}

/// Endpoint: `GET /admin/app-settings`
pub async fn app_settings(State(state): State<AppState>, AdminSession(_): AdminSession) -> Result<Json<Vec<AppSetting>>> {
    Ok(Json(state.services.admin_service.app_settings().await?))
}

/// Endpoint: `PUT /admin/app-settings/:key`
pub async fn update_app_setting(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Path(key): Path<String>,
    Json(request): Json<UpdateSettingRequest>,
) -> Result<Json<AppSetting>> {
    let setting = state
        .services
        .admin_service
        .update_app_setting(&actor, &key, &request)
        .await?;
    Ok(Json(setting))
}
