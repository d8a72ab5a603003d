//! sc2link Shared - wire types for client/game communication
//!
//! This crate contains everything that crosses the wire:
//! - Request and response messages
//! - The `MessageCodec` seam and its JSON implementation
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, thiserror and tracing
//! 2. **No transport logic** - Pure data types and serialization

pub mod codec;
pub mod requests;
pub mod responses;

pub use codec::{CodecError, HasStatus, JsonCodec, MessageCodec, Sc2Codec};
pub use requests::{
    CreateGameSettings, Difficulty, InterfaceOptions, JoinGameSettings, MapSource, PlayerKind,
    PlayerSetup, Race, Request,
};
pub use responses::{
    AvailableMaps, CreateGameError, CreateGameResult, JoinGameError, JoinGameResult, PingResult,
    Response, ResponsePayload,
};

// Re-export domain vocabulary for convenience
pub use sc2link_domain::{RequestId, Status};
