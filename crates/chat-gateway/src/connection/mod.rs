//! Connection management
//!
//! Tracks WebSocket connections, their lifecycle, and the token gate in front of them.

mod connection;
mod gate;
mod manager;

pub use connection::{Connection, ConnectionState, InvalidTransition};
pub use gate::{ConnectionGate, GateError, TokenSource};
pub use manager::{spawn_sweeper, ConnectionManager};
