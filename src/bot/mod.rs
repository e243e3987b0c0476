//! Menu navigation: reply id routing and message builders

pub mod builders;
pub mod menu;

pub use menu::MenuAction;
