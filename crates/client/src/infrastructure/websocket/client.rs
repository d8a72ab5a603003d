//! WebSocket transport using tokio-tungstenite

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use super::backoff::BackoffState;
use crate::config::RetryConfig;
use crate::ports::outbound::{FrameTransport, TransportError};

/// One WebSocket connection carrying one frame per binary message.
pub struct WebSocketTransport<S = MaybeTlsStream<TcpStream>> {
    stream: WebSocketStream<S>,
}

impl WebSocketTransport {
    /// Dial `url`, retrying with exponential backoff until `retry` runs out.
    ///
    /// The game process takes a while to open its API port after launch, so
    /// refused connections are expected for the first few seconds.
    pub async fn connect(url: &Url, retry: &RetryConfig) -> Result<Self, TransportError> {
        let mut backoff = BackoffState::new(retry.clone());

        while let Some(delay) = backoff.next_delay_and_advance() {
            if delay > 0 {
                tracing::debug!(
                    attempt = backoff.attempts(),
                    max_attempts = backoff.max_attempts(),
                    delay_ms = delay,
                    "Waiting before next connection attempt"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match connect_async(url.as_str()).await {
                Ok((stream, _)) => {
                    tracing::info!(url = %url, attempt = backoff.attempts(), "Connected to game API");
                    return Ok(Self { stream });
                }
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        attempt = backoff.attempts(),
                        max_attempts = backoff.max_attempts(),
                        error = %e,
                        "Connection attempt failed"
                    );
                }
            }
        }

        tracing::error!(url = %url, attempts = backoff.attempts(), "Max connection attempts reached, giving up");
        Err(TransportError::ConnectExhausted {
            url: url.to_string(),
            attempts: backoff.attempts(),
        })
    }
}

impl<S> WebSocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already upgraded stream (either side of the connection).
    pub fn from_stream(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

fn is_closed(error: &tungstenite::Error) -> bool {
    matches!(
        error,
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
    )
}

#[async_trait]
impl<S> FrameTransport for WebSocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write_frame(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        match self.stream.send(Message::Binary(frame)).await {
            Ok(()) => Ok(()),
            Err(e) if is_closed(&e) => Err(TransportError::Closed),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        // `next()` only completes once a whole message is buffered, so
        // dropping this future never loses part of a frame.
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Binary(data))) => return Ok(data),
                Some(Ok(Message::Text(text))) => return Ok(text.into_bytes()),
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "Server closed connection");
                    return Err(TransportError::Closed);
                }
                // Pongs for incoming pings are queued by tungstenite itself.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Err(e)) if is_closed(&e) => return Err(TransportError::Closed),
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TransportError::Closed),
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.stream.close(None).await {
            Ok(()) => Ok(()),
            Err(e) if is_closed(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
