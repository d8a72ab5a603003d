//! sc2link Client - pipelined request/response client for the game API.
//!
//! ## Architecture
//!
//! - `ports/outbound` - the `FrameTransport` seam
//! - `correlation` - request identifiers, response buffering, status tracking
//! - `infrastructure` - WebSocket and length-delimited transports
//! - `application` - `GameClient`, the typed game API
//!
//! Requests are written as soon as they are issued. Responses are read off the
//! wire lazily, when somebody asks for one, and any earlier responses read on
//! the way are buffered until their owner asks for them.

pub mod application;
pub mod config;
pub mod correlation;
pub mod infrastructure;
pub mod ports;

pub use application::{ClientError, GameClient};
pub use config::{ClientConfig, RetryConfig};
pub use correlation::{CorrelationError, Correlator, SharedCorrelator, StatusObserver};
pub use infrastructure::{LengthDelimitedTransport, WebSocketTransport};
pub use ports::outbound::{FrameTransport, TransportError};
