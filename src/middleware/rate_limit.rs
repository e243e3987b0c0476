//! Rate limiting of admin login attempts
//!
//! Attempts are counted per lower-cased username with a keyed `governor`
//! limiter, so guessing one account does not lock out the others.

use std::num::NonZeroU32;
use std::sync::Arc;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;
use crate::utils::errors::{BotError, Result};

#[derive(Clone)]
pub struct LoginRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl LoginRateLimiter {
    /// Allow `attempts_per_minute` attempts per username, at least one
    pub fn new(attempts_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
        }
    }

    /// Count one attempt for `username`
    pub fn check(&self, username: &str) -> Result<()> {
        let key = username.trim().to_lowercase();
        if self.limiter.check_key(&key).is_err() {
            warn!(username = %key, "Login rate limit exceeded");
            return Err(BotError::RateLimitExceeded);
        }

        // Drop keys whose quota has fully replenished
        self.limiter.retain_recent();
        Ok(())
    }
}

impl std::fmt::Debug for LoginRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRateLimiter")
            .field("tracked_keys", &self.limiter.len())
            .finish()
    }
}
