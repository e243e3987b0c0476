//! Test helpers module
//!
//! Shared by the integration tests: a mock WhatsApp Cloud API, the test
//! database and webhook payload builders.

#![allow(dead_code)]

pub mod database_helper;
pub mod test_data;
pub mod whatsapp_mock;

pub use database_helper::*;
pub use test_data::*;
pub use whatsapp_mock::*;
