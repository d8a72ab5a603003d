//! Game client errors.

use thiserror::Error;

use sc2link_shared::{CreateGameError, JoinGameError};

use crate::correlation::CorrelationError;
use crate::ports::outbound::TransportError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// The game rejected the request outright.
    #[error("Game API returned errors: {}", .0.join("; "))]
    Api(Vec<String>),

    /// The response carried a payload for a different request kind.
    #[error("Expected {expected} response, got {actual}")]
    UnexpectedResponse {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Create game failed: {code} ({})", .details.as_deref().unwrap_or(""))]
    CreateGame {
        code: CreateGameError,
        details: Option<String>,
    },

    #[error("Join game failed: {code} ({})", .details.as_deref().unwrap_or(""))]
    JoinGame {
        code: JoinGameError,
        details: Option<String>,
    },
}

impl ClientError {
    /// Whether the connection to the game is gone.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Correlation(e) => e.is_connection_lost(),
            _ => false,
        }
    }
}
