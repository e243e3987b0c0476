//! Authentication extractors
//!
//! Admin handlers take an [`AdminSession`] (any active operator) or a
//! [`SuperAdminSession`] argument. Both read the bearer token from the
//! `Authorization` header and reload the account on every request.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, USER_AGENT};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::{debug, warn};
use crate::models::AdminActor;
use crate::utils::errors::BotError;
use crate::web::AppState;

/// Any authenticated and active operator
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminActor);

/// An authenticated operator with the `super_admin` role
#[derive(Debug, Clone)]
pub struct SuperAdminSession(pub AdminActor);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = BotError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| BotError::Authentication("Silakan login terlebih dahulu".to_string()))?;

        let admin = state.services.auth_service.authenticate(token).await?;
        debug!(admin_id = admin.id, path = %parts.uri.path(), "Admin request authenticated");

        Ok(AdminSession(AdminActor {
            admin,
            ip_address: client_ip(&parts.headers),
            user_agent: header_value(&parts.headers, USER_AGENT.as_str()),
        }))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SuperAdminSession {
    type Rejection = BotError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AdminSession(actor) = AdminSession::from_request_parts(parts, state).await?;

        if !actor.admin.is_super_admin() {
            warn!(admin_id = actor.id(), path = %parts.uri.path(), "Super admin access denied");
            return Err(BotError::PermissionDenied(
                "Hanya super admin yang dapat mengakses halaman ini".to_string(),
            ));
        }

        Ok(SuperAdminSession(actor))
    }
}

/// Token of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Client address as reported by the reverse proxy
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_value(headers, "x-real-ip"))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers(&[("authorization", "Bearer abc.def")])), Some("abc.def"));
        assert_eq!(bearer_token(&headers(&[("authorization", "bearer abc")])), Some("abc"));
        assert_eq!(bearer_token(&headers(&[("authorization", "Basic abc")])), None);
        assert_eq!(bearer_token(&headers(&[("authorization", "Bearer ")])), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let map = headers(&[("x-forwarded-for", "10.1.1.1, 172.16.0.1"), ("x-real-ip", "10.2.2.2")]);
        assert_eq!(client_ip(&map).as_deref(), Some("10.1.1.1"));

        let map = headers(&[("x-real-ip", "10.2.2.2")]);
        assert_eq!(client_ip(&map).as_deref(), Some("10.2.2.2"));

        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
