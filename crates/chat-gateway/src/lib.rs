//! # chat-gateway
//!
//! WebSocket gateway for one-to-one chat: token-gated `/chat` sockets,
//! `createRoom`/`sendMessage` events, and fan-out delivery from Redis.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

#[cfg(test)]
mod test_support;

pub use server::{create_app, create_gateway_state, run, GatewayState};
