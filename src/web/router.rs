//! Route table

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use super::{admin, public, webhook, AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health))
        .route("/send-test", post(public::send_test))
        .route("/webhook", get(webhook::verify).post(webhook::receive))
        .nest("/admin", admin::routes())
        .layer(middleware::from_fn(crate::middleware::request_logging))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::database::DatabaseService;
    use crate::services::ServiceFactory;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// State over a lazy pool; routes that never reach the database work
    /// without a server.
    fn test_state() -> AppState {
        let mut settings = Settings::default();
        settings.whatsapp.verify_token = "verify-me".to_string();
        settings.admin.session_secret = "router-test-secret".to_string();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/ptsp_router_test")
            .unwrap();
        let services = ServiceFactory::new(DatabaseService::new(pool), &settings).unwrap();
        AppState::new(services, settings)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_webhook_verification() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=4242")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "4242");
    }

    #[tokio::test]
    async fn test_webhook_verification_rejects_wrong_token() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=4242")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Forbidden");
    }

    #[tokio::test]
    async fn test_webhook_bad_json_is_error() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_webhook_ignores_other_objects() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"object":"page","entry":[]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ignored");
    }

    #[tokio::test]
    async fn test_send_test_validates_number() {
        for body in [r#"{}"#, r#"{"to":"+62 8123-4567-8901-2345-6789"}"#] {
            let response = build_router(test_state())
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/send-test")
                        .header("content-type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        }
    }

    #[tokio::test]
    async fn test_admin_requires_token() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/admin/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
