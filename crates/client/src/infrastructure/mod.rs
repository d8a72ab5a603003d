//! Infrastructure layer - concrete transports behind the outbound ports.

pub mod stream;
pub mod websocket;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use stream::LengthDelimitedTransport;
pub use websocket::WebSocketTransport;
