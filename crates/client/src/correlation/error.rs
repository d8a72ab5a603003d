//! Correlation errors.

use thiserror::Error;

use sc2link_domain::RequestId;
use sc2link_shared::CodecError;

use crate::ports::outbound::TransportError;

/// Errors returned by the correlation engine.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum CorrelationError {
    /// The outgoing message could not be serialized. No identifier was consumed.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] CodecError),

    /// The frame could not be written. No identifier was consumed.
    #[error("Failed to write request frame: {0}")]
    Write(#[source] TransportError),

    /// The transport failed while waiting for the frame of `id`.
    ///
    /// Nothing was consumed; retrying drains the same frame.
    #[error("Failed to read response frame for request {id}: {source}")]
    Read {
        id: RequestId,
        #[source]
        source: TransportError,
    },

    /// The frame for `id` arrived but could not be decoded. It has left the
    /// wire, so `id` can no longer be retrieved.
    #[error("Failed to decode response frame for request {id}: {source}")]
    Decode {
        id: RequestId,
        #[source]
        source: CodecError,
    },

    /// `id` was never issued on this connection, or was already retrieved.
    #[error("No response for request {0}, did you already retrieve it?")]
    UnknownOrConsumed(RequestId),

    #[error("Timed out waiting for response to request {0}")]
    TimedOut(RequestId),

    #[error("Cancelled while waiting for response to request {0}")]
    Cancelled(RequestId),
}

impl CorrelationError {
    /// Whether the underlying connection is unusable after this error.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            CorrelationError::Write(_) | CorrelationError::Read { .. }
        )
    }
}
