//! WebSocket transport for the game API endpoint.

pub mod backoff;
pub mod client;

pub use backoff::BackoffState;
pub use client::WebSocketTransport;
