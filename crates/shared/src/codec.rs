//! Message codec - turns requests into frame bytes and frame bytes into responses.
//!
//! The correlation engine is generic over [`MessageCodec`]; the only thing it
//! needs from a decoded response is its lifecycle status ([`HasStatus`]).

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use sc2link_domain::Status;

use crate::requests::Request;
use crate::responses::Response;

/// Errors raised while encoding or decoding a frame payload
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode message ({len} bytes): {source}")]
    Decode {
        len: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Exposes the lifecycle status embedded in a decoded response.
pub trait HasStatus {
    fn status(&self) -> Status;
}

impl HasStatus for Response {
    fn status(&self) -> Status {
        self.status
    }
}

/// Encodes outgoing requests and decodes incoming responses.
pub trait MessageCodec: Send + Sync {
    type Request: Send + Sync;
    type Response: HasStatus + Send;

    fn encode(&self, request: &Self::Request) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, frame: &[u8]) -> Result<Self::Response, CodecError>;
}

/// JSON codec for any serde request/response pair.
pub struct JsonCodec<Req, Resp> {
    _marker: PhantomData<fn(&Req) -> Resp>,
}

impl<Req, Resp> JsonCodec<Req, Resp> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<Req, Resp> Default for JsonCodec<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> Clone for JsonCodec<Req, Resp> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<Req, Resp> std::fmt::Debug for JsonCodec<Req, Resp> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<Req, Resp> MessageCodec for JsonCodec<Req, Resp>
where
    Req: Serialize + Send + Sync,
    Resp: DeserializeOwned + HasStatus + Send,
{
    type Request = Req;
    type Response = Resp;

    fn encode(&self, request: &Req) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(request).map_err(CodecError::Encode)
    }

    fn decode(&self, frame: &[u8]) -> Result<Resp, CodecError> {
        serde_json::from_slice(frame).map_err(|source| {
            tracing::debug!(len = frame.len(), error = %source, "Undecodable response frame");
            CodecError::Decode {
                len: frame.len(),
                source,
            }
        })
    }
}

/// Codec for the game API messages.
pub type Sc2Codec = JsonCodec<Request, Response>;
