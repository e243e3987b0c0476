//! JSON admin API
//!
//! Every route except `/login` requires a bearer token, see
//! [`crate::middleware::auth`].

pub mod account;
pub mod catalog;
pub mod monitoring;
pub mod operators;

use axum::routing::{get, post, put};
use axum::Router;
use super::AppState;

/// Routes mounted under `/admin`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/profile", get(account::profile).put(account::update_profile))
        .route("/settings/password", post(account::change_password))
        .route("/app-settings", get(account::app_settings))
        .route("/app-settings/:key", put(account::update_app_setting))
        .route("/dashboard", get(monitoring::dashboard))
        .route("/users", get(monitoring::users))
        .route("/users/:id", get(monitoring::user_detail))
        .route("/messages", get(monitoring::messages))
        .route("/analytics", get(monitoring::analytics))
        .route("/api/stats", get(monitoring::live_stats))
        .nest("/layanan", catalog_routes())
        .nest("/super-admin", operator_routes())
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_layanan).post(catalog::create_layanan))
        .route("/kategori", get(catalog::list_kategori).post(catalog::create_kategori))
        .route(
            "/kategori/:id",
            get(catalog::get_kategori)
                .put(catalog::update_kategori)
                .delete(catalog::delete_kategori),
        )
        .route(
            "/:id",
            get(catalog::get_layanan)
                .put(catalog::update_layanan)
                .delete(catalog::delete_layanan),
        )
        .route("/:id/toggle", post(catalog::toggle_layanan))
}

fn operator_routes() -> Router<AppState> {
    Router::new()
        .route("/admins", get(operators::list_admins).post(operators::create_admin))
        .route(
            "/admins/:id",
            put(operators::update_admin).delete(operators::delete_admin),
        )
        .route("/admins/:id/toggle-status", post(operators::toggle_admin))
        .route("/activity", get(operators::activity))
}
