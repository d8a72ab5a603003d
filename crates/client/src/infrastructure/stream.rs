//! Length-prefixed framing over any byte stream.
//!
//! Each frame is a 4-byte big-endian length followed by the payload. Used for
//! plain TCP or Unix sockets and for in-process pipes in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::ports::outbound::{FrameTransport, TransportError};

/// Largest frame accepted in either direction.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 16 * 1024 * 1024;

pub struct LengthDelimitedTransport<S> {
    framed: Framed<S, LengthDelimitedCodec>,
}

impl<S> LengthDelimitedTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self::with_max_frame_length(stream, DEFAULT_MAX_FRAME_LENGTH)
    }

    pub fn with_max_frame_length(stream: S, max_frame_length: usize) -> Self {
        let codec = LengthDelimitedCodec::builder()
            .max_frame_length(max_frame_length)
            .new_codec();
        Self {
            framed: Framed::new(stream, codec),
        }
    }
}

#[async_trait]
impl<S> FrameTransport for LengthDelimitedTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write_frame(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.framed.send(Bytes::from(frame)).await?;
        Ok(())
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        // Partial frames stay in the `Framed` read buffer, so a dropped read
        // resumes where it left off.
        match self.framed.next().await {
            Some(Ok(bytes)) => Ok(bytes.to_vec()),
            Some(Err(e)) => Err(e.into()),
            None => Err(TransportError::Closed),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        SinkExt::<Bytes>::close(&mut self.framed).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_survive_the_pipe() {
        let (a, b) = tokio::io::duplex(64);
        let mut left = LengthDelimitedTransport::new(a);
        let mut right = LengthDelimitedTransport::new(b);

        left.write_frame(b"first".to_vec()).await.unwrap();
        left.write_frame(Vec::new()).await.unwrap();

        assert_eq!(right.read_frame().await.unwrap(), b"first".to_vec());
        assert_eq!(right.read_frame().await.unwrap(), Vec::<u8>::new());
    }

    #[tokio::test]
    async fn close_flushes_then_ends_peer_stream() {
        let (a, b) = tokio::io::duplex(64);
        let mut writer = LengthDelimitedTransport::new(a);
        let mut reader = LengthDelimitedTransport::new(b);

        writer.write_frame(b"last".to_vec()).await.unwrap();
        writer.close().await.unwrap();

        assert_eq!(reader.read_frame().await.unwrap(), b"last".to_vec());
        assert!(matches!(reader.read_frame().await, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn peer_hangup_is_closed() {
        let (a, b) = tokio::io::duplex(64);
        let mut reader = LengthDelimitedTransport::new(a);
        drop(b);

        assert!(matches!(reader.read_frame().await, Err(TransportError::Closed)));
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let (a, b) = tokio::io::duplex(1024);
        let mut writer = LengthDelimitedTransport::new(a);
        let mut reader = LengthDelimitedTransport::with_max_frame_length(b, 8);

        writer.write_frame(vec![7u8; 32]).await.unwrap();
        assert!(matches!(reader.read_frame().await, Err(TransportError::Io(_))));
    }
}
