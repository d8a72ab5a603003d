//! Frame Transport Port - Outbound port for the framed byte stream to the game
//!
//! This port abstracts the ordered, full-duplex connection the correlation
//! engine talks over, so the engine never depends on a concrete socket type.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer closed the connection (close frame or end of stream)
    #[error("Connection closed by peer")]
    Closed,

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Every connection attempt allowed by the retry policy failed
    #[error("Gave up connecting to {url} after {attempts} attempts")]
    ConnectExhausted { url: String, attempts: u32 },
}

/// Ordered, full-duplex stream of self-delimited frames.
///
/// Frames are delivered in the order the peer sent them. Implementations must
/// frame explicitly (message boundaries or a length prefix); they never infer
/// a boundary from a short read.
///
/// # Cancel safety
///
/// `read_frame` must be cancel safe: if the returned future is dropped before
/// it completes, no frame (and no part of a frame) is lost, and the next call
/// returns the frame that would have been returned. The correlation engine
/// relies on this to keep its counters consistent when a caller gives up
/// waiting on a response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameTransport: Send {
    /// Write one complete frame.
    async fn write_frame(&mut self, frame: Vec<u8>) -> Result<(), TransportError>;

    /// Read the next complete frame.
    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Close the connection. Further reads and writes fail.
    async fn close(&mut self) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: FrameTransport + ?Sized> FrameTransport for Box<T> {
    async fn write_frame(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        (**self).write_frame(frame).await
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        (**self).read_frame().await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        (**self).close().await
    }
}
