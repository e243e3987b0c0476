//! Category and service administration under `/admin/layanan`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use crate::middleware::AdminSession;
use crate::models::{CreateKategoriRequest, Kategori, KategoriSummary, Layanan, LayananFilter, LayananForm, UpdateKategoriRequest};
use crate::services::catalog::LayananAdminView;
use crate::utils::errors::Result;
use crate::web::AppState;

/// Endpoint: `GET /admin/layanan/kategori`
pub async fn list_kategori(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
) -> Result<Json<Vec<KategoriSummary>>> {
    Ok(Json(state.services.catalog_service.list_kategori().await?))
}

/// Endpoint: `GET /admin/layanan/kategori/:id`
pub async fn get_kategori(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Kategori>> {
    Ok(Json(state.services.catalog_service.get_kategori(id).await?))
}

/// Create a category.
///
/// Endpoint: `POST /admin/layanan/kategori`
///
/// Response codes:
/// - 201 with the category
/// - 400 on an invalid code or empty name
/// - 409 when the code is taken
pub async fn create_kategori(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Json(request): Json<CreateKategoriRequest>,
) -> Result<(StatusCode, Json<Kategori>)> {
    let kategori = state.services.catalog_service.create_kategori(&actor, &request).await?;
    Ok((StatusCode::CREATED, Json(kategori)))
}

/// Endpoint: `PUT /admin/layanan/kategori/:id`
pub async fn update_kategori(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Path(id): Path<i64>,
    Json(request): Json<UpdateKategoriRequest>,
) -> Result<Json<Kategori>> {
    let kategori = state
        .services
        .catalog_service
        .update_kategori(&actor, id, &request)
        .await?;
    Ok(Json(kategori))
}

/// Delete an empty category.
///
/// Endpoint: `DELETE /admin/layanan/kategori/:id`
///
/// Response codes:
/// - 200 when deleted
/// - 404 when missing
/// - 409 while services still belong to it
pub async fn delete_kategori(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.services.catalog_service.delete_kategori(&actor, id).await?;
    Ok(Json(json!({ "status": "deleted", "id": id })))
}

/// Endpoint: `GET /admin/layanan?kategori_id&search`
pub async fn list_layanan(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    Query(filter): Query<LayananFilter>,
) -> Result<Json<Vec<Layanan>>> {
    Ok(Json(state.services.catalog_service.list_layanan(&filter).await?))
}

/// Endpoint: `GET /admin/layanan/:id`
pub async fn get_layanan(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<LayananAdminView>> {
    Ok(Json(state.services.catalog_service.get_layanan(id).await?))
}

/// Create a service with its requirement and SOP lists.
///
/// Endpoint: `POST /admin/layanan`
///
/// Response codes:
/// - 201 with the service and its generated public id
/// - 400 when the title is empty
/// - 404 when the category does not exist
pub async fn create_layanan(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Json(form): Json<LayananForm>,
) -> Result<(StatusCode, Json<Layanan>)> {
    let layanan = state.services.catalog_service.create_layanan(&actor, &form).await?;
    Ok((StatusCode::CREATED, Json(layanan)))
}

/// Endpoint: `PUT /admin/layanan/:id`
pub async fn update_layanan(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Path(id): Path<i64>,
    Json(form): Json<LayananForm>,
) -> Result<Json<Layanan>> {
    let layanan = state.services.catalog_service.update_layanan(&actor, id, &form).await?;
    Ok(Json(layanan))
}

/// Endpoint: `DELETE /admin/layanan/:id`
pub async fn delete_layanan(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    state.services.catalog_service.delete_layanan(&actor, id).await?;
    Ok(Json(json!({ "status": "deleted", "id": id })))
}

/// Endpoint: `POST /admin/layanan/:id/toggle`
pub async fn toggle_layanan(
    State(state): State<AppState>,
    AdminSession(actor): AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<Layanan>> {
    Ok(Json(state.services.catalog_service.toggle_layanan(&actor, id).await?))
}
