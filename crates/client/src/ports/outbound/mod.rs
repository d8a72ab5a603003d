//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the correlation engine to talk to the game without depending on
//! concrete socket implementations.

pub mod transport_port;

pub use transport_port::{FrameTransport, TransportError};

#[cfg(test)]
pub use transport_port::MockFrameTransport;
