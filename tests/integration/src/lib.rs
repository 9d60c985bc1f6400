//! Integration test utilities for the chat server
//!
//! Spawns the REST API and the WebSocket gateway against real PostgreSQL and
//! Redis instances and drives them over HTTP and WebSocket.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
