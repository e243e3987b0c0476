//! Admin authentication service
//!
//! Passwords are stored as argon2 PHC strings. Sessions are stateless HS256
//! bearer tokens; an admin that is deleted or deactivated loses access on the
//! next request because every request reloads the account.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::config::AdminConfig;
use crate::database::DatabaseService;
use crate::middleware::rate_limit::LoginRateLimiter;
use crate::models::{AdminActor, AdminProfile, AdminUser};
use crate::utils::errors::{BotError, Result};

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Admin id
    pub sub: i64,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub admin: AdminProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Clone)]
pub struct AuthService {
    db: DatabaseService,
    config: AdminConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    limiter: LoginRateLimiter,
}

impl AuthService {
    pub fn new(db: DatabaseService, config: AdminConfig) -> Self {
        let secret = config.session_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            limiter: LoginRateLimiter::new(config.login_attempts_per_minute),
            db,
            config,
        }
    }

    /// Check credentials and issue a session token
    pub async fn login(&self, request: &LoginRequest, ip_address: Option<String>, user_agent: Option<String>) -> Result<LoginResponse> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(BotError::InvalidInput("Username dan password harus diisi".to_string()));
        }

        self.limiter.check(username)?;

        let admin = match self.db.admins.find_by_username(username).await? {
            Some(admin) if verify_password(&request.password, &admin.password_hash) => admin,
            _ => {
                warn!(username = %username, "Failed admin login");
                return Err(BotError::Authentication("Username atau password salah".to_string()));
            }
        };

        if !admin.is_active {
            warn!(admin_id = admin.id, "Login attempt on inactive account");
            return Err(BotError::PermissionDenied("Akun Anda tidak aktif".to_string()));
        }

        self.db.admins.touch_last_login(admin.id).await?;

        let ttl = if request.remember {
            Duration::days(self.config.remember_ttl_days)
        } else {
            Duration::hours(self.config.session_ttl_hours)
        };
        let (token, expires_at) = self.issue_token(&admin, ttl)?;

        let actor = AdminActor { admin, ip_address, user_agent };
        self.db.log_activity(actor.activity("login", None, "Login berhasil")).await;
        info!(admin_id = actor.id(), username = %actor.admin.username, "Admin logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_at,
            admin: AdminProfile::from(actor.admin),
        })
    }

    /// Sign a token valid for `ttl`
    pub fn issue_token(&self, admin: &AdminUser, ttl: Duration) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims {
            sub: admin.id,
            username: admin.username.clone(),
            role: admin.role.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    /// Verify signature and expiry of a token
    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    /// Admin behind a bearer token; the account must still exist and be active
    pub async fn authenticate(&self, token: &str) -> Result<AdminUser> {
        let claims = self.decode_token(token)?;

        let admin = self
            .db
            .admins
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| BotError::Authentication("Akun tidak ditemukan".to_string()))?;

        if !admin.is_active {
            return Err(BotError::PermissionDenied("Akun Anda tidak aktif".to_string()));
        }

        Ok(admin)
    }

    pub async fn logout(&self, actor: &AdminActor) {
        self.db.log_activity(actor.activity("logout", None, "Logout")).await;
        info!(admin_id = actor.id(), "Admin logged out");
    }

    /// Change the caller's own password
    pub async fn change_password(&self, actor: &AdminActor, request: &ChangePasswordRequest) -> Result<()> {
        if !verify_password(&request.current_password, &actor.admin.password_hash) {
            return Err(BotError::InvalidInput("Password saat ini salah".to_string()));
        }
        self.check_new_password(&request.new_password)?;
        if request.new_password != request.confirm_password {
            return Err(BotError::InvalidInput("Konfirmasi password tidak cocok".to_string()));
        }

        let hash = hash_password(&request.new_password)?;
        self.db.admins.update_password(actor.id(), &hash).await?;
        self.db
            .log_activity(actor.activity("change_password", Some(("admin", actor.id())), "Mengubah password"))
            .await;

        Ok(())
    }

    /// Minimum length rule for new passwords
    pub fn check_new_password(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.config.min_password_length {
            return Err(BotError::InvalidInput(format!(
                "Password minimal {} karakter",
                self.config.min_password_length
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BotError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string; malformed hashes never match
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}
