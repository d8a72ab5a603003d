//! Request/response correlator.
//!
//! Lets a single caller pipeline requests over one ordered connection and
//! collect the responses later, by identifier, in any order, exactly once.
//!
//! Flow:
//! 1. `request()` writes one frame and returns the next `RequestId`
//! 2. `response(id)` drains frames off the wire until `id` has arrived,
//!    buffering every earlier frame nobody has asked for yet
//! 3. The buffered entry for `id` is removed and returned
//!
//! The transport answers requests in the order they were sent, so the n-th
//! frame read off the wire belongs to the n-th request written.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use sc2link_domain::{RequestId, Status};
use sc2link_shared::{HasStatus, MessageCodec};

use super::error::CorrelationError;
use super::pending::PendingResponses;
use super::sequence::SequenceAllocator;
use super::status::{StatusCell, StatusObserver};
use crate::ports::outbound::{FrameTransport, TransportError};

/// Correlation engine for one connection.
///
/// All state (counters, buffer, status) lives and dies with the connection.
pub struct Correlator<T, C: MessageCodec> {
    transport: T,
    codec: C,
    sequence: SequenceAllocator,
    pending: PendingResponses<C::Response>,
    status: StatusCell,
}

impl<T, C> Correlator<T, C>
where
    T: FrameTransport,
    C: MessageCodec,
{
    /// Wrap an established connection. The game is assumed to be `Launched`.
    pub fn new(transport: T, codec: C) -> Self {
        Self::with_initial_status(transport, codec, Status::Launched)
    }

    pub fn with_initial_status(transport: T, codec: C, status: Status) -> Self {
        Self {
            transport,
            codec,
            sequence: SequenceAllocator::new(),
            pending: PendingResponses::new(),
            status: StatusCell::new(status),
        }
    }

    /// Status carried by the most recently drained frame.
    pub fn current_status(&self) -> Status {
        self.status.get()
    }

    pub fn status_observer(&self) -> StatusObserver {
        self.status.observer()
    }

    /// Highest identifier issued so far.
    pub fn last_request(&self) -> u64 {
        self.sequence.last_allocated()
    }

    /// Highest identifier whose frame has been drained so far.
    pub fn last_response(&self) -> u64 {
        self.pending.last_response()
    }

    /// Responses drained but not yet retrieved.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Send a request and return the identifier its response will carry.
    ///
    /// An identifier is only consumed once the frame has been written; a
    /// failed encode or write leaves the sequence untouched.
    pub async fn request(&mut self, message: &C::Request) -> Result<RequestId, CorrelationError> {
        let frame = self
            .codec
            .encode(message)
            .map_err(CorrelationError::Encode)?;
        let len = frame.len();

        if let Err(e) = self.transport.write_frame(frame).await {
            warn!(
                next_request_id = %self.sequence.peek_next(),
                error = %e,
                "Failed to write request frame"
            );
            return Err(CorrelationError::Write(e));
        }

        let id = self.sequence.allocate();
        debug!(request_id = %id, bytes = len, "Request sent");
        Ok(id)
    }

    /// Retrieve the response for `id`, reading from the wire as needed.
    ///
    /// Suspends until every frame up to and including `id` has been drained.
    /// Each identifier can be retrieved once; a second attempt, or an
    /// identifier that was never issued, fails with
    /// [`CorrelationError::UnknownOrConsumed`] without touching the wire.
    pub async fn response(&mut self, id: RequestId) -> Result<C::Response, CorrelationError> {
        if !self.sequence.was_issued(id) {
            debug!(request_id = %id, last_request = self.last_request(), "Response requested for an identifier that was never issued");
            return Err(CorrelationError::UnknownOrConsumed(id));
        }

        while !self.pending.is_drained(id) {
            self.drain_one().await?;
        }

        match self.pending.take(id) {
            Some(response) => {
                trace!(request_id = %id, still_buffered = self.pending.len(), "Response retrieved");
                Ok(response)
            }
            None => {
                debug!(request_id = %id, "Response already retrieved");
                Err(CorrelationError::UnknownOrConsumed(id))
            }
        }
    }

    /// [`response`](Self::response) with a deadline.
    ///
    /// On timeout no partial frame is consumed, so the same call can be retried.
    pub async fn response_with_timeout(
        &mut self,
        id: RequestId,
        timeout: Duration,
    ) -> Result<C::Response, CorrelationError> {
        let outcome = tokio::time::timeout(timeout, self.response(id)).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    request_id = %id,
                    timeout_ms = timeout.as_millis() as u64,
                    last_response = self.last_response(),
                    "Timed out waiting for response"
                );
                Err(CorrelationError::TimedOut(id))
            }
        }
    }

    /// [`response`](Self::response) that gives up when `token` is cancelled.
    pub async fn response_until_cancelled(
        &mut self,
        id: RequestId,
        token: &CancellationToken,
    ) -> Result<C::Response, CorrelationError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(request_id = %id, "Cancelled while waiting for response");
                Err(CorrelationError::Cancelled(id))
            }
            result = self.response(id) => result,
        }
    }

    /// Send a request and wait for its response.
    pub async fn req_resp(&mut self, message: &C::Request) -> Result<C::Response, CorrelationError> {
        let id = self.request(message).await?;
        self.response(id).await
    }

    /// Close the underlying connection, dropping any buffered responses.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        if !self.pending.is_empty() {
            let dropped = self.pending.clear();
            debug!(dropped, "Discarded unclaimed responses on close");
        }
        self.transport.close().await
    }

    /// Read one frame and file it under the next undrained identifier.
    ///
    /// The counter only moves once a frame has actually left the wire: a
    /// failed (or cancelled) read leaves it alone so a retry drains the same
    /// frame. A frame that fails to decode is gone, so the counter moves past
    /// it to keep later frames lined up with their requests.
    async fn drain_one(&mut self) -> Result<RequestId, CorrelationError> {
        let target = self.pending.next_to_drain();

        let frame = self
            .transport
            .read_frame()
            .await
            .map_err(|source| CorrelationError::Read { id: target, source })?;

        match self.codec.decode(&frame) {
            Ok(response) => {
                let status = response.status();
                self.status.set(status);
                let id = self.pending.store_drained(response);
                trace!(request_id = %id, %status, bytes = frame.len(), "Drained response frame");
                Ok(id)
            }
            Err(source) => {
                let id = self.pending.skip_undecodable();
                warn!(request_id = %id, error = %source, "Dropping undecodable response frame");
                Err(CorrelationError::Decode { id, source })
            }
        }
    }
}
