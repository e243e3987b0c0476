//! HTTP surface
//!
//! The WhatsApp webhook, the public health and test endpoints, and the JSON
//! admin API all share one [`AppState`].

pub mod admin;
pub mod public;
pub mod router;
pub mod webhook;

pub use router::build_router;

use std::sync::Arc;
use crate::config::Settings;
use crate::services::ServiceFactory;

/// Shared state handed to every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub services: ServiceFactory,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(services: ServiceFactory, settings: Settings) -> Self {
        Self {
            services,
            settings: Arc::new(settings),
        }
    }
}
