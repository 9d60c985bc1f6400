//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod favorites;
pub mod health;
pub mod messages;
pub mod rooms;
