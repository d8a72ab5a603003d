//! Application layer - typed game API on top of the correlator.

pub mod error;
pub mod game_client;

pub use error::ClientError;
pub use game_client::GameClient;
