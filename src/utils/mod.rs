//! Utility modules
//!
//! This module contains common utilities used throughout the application,
//! including error handling, logging setup, pagination and helper functions.

pub mod errors;
pub mod logging;
pub mod helpers;
pub mod pagination;

pub use errors::{BotError, Result};
pub use pagination::{Page, Pagination};
