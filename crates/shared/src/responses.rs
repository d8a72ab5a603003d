//! Response messages (game → client)
//!
//! Every response carries the game's lifecycle status at the time it was
//! produced, plus an optional request-specific payload.

use serde::{Deserialize, Serialize};

use sc2link_domain::Status;

// =============================================================================
// Response
// =============================================================================

/// One response frame from the game process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Lifecycle state the game was in when it produced this response
    #[serde(default)]
    pub status: Status,
    /// Request-level errors reported by the game (e.g. "request not valid in this state")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ResponsePayload>,
}

impl Response {
    pub fn new(status: Status, payload: ResponsePayload) -> Self {
        Self {
            status,
            error: Vec::new(),
            payload: Some(payload),
        }
    }

    /// A response carrying only request-level errors.
    pub fn rejected(status: Status, error: Vec<String>) -> Self {
        Self {
            status,
            error,
            payload: None,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Request-specific response data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    CreateGame(CreateGameResult),
    JoinGame(JoinGameResult),
    LeaveGame,
    Ping(PingResult),
    AvailableMaps(AvailableMaps),
    Step {
        #[serde(default)]
        simulation_loop: u32,
    },
    Quit,
}

impl ResponsePayload {
    /// Short name used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponsePayload::CreateGame(_) => "create_game",
            ResponsePayload::JoinGame(_) => "join_game",
            ResponsePayload::LeaveGame => "leave_game",
            ResponsePayload::Ping(_) => "ping",
            ResponsePayload::AvailableMaps(_) => "available_maps",
            ResponsePayload::Step { .. } => "step",
            ResponsePayload::Quit => "quit",
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PingResult {
    #[serde(default)]
    pub game_version: String,
    #[serde(default)]
    pub data_version: String,
    #[serde(default)]
    pub data_build: u32,
    #[serde(default)]
    pub base_build: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableMaps {
    #[serde(default)]
    pub local_map_paths: Vec<String>,
    #[serde(default)]
    pub battlenet_map_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateGameResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CreateGameError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoinGameResult {
    #[serde(default)]
    pub player_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JoinGameError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

// =============================================================================
// Error Codes
// =============================================================================

/// Reasons a game could not be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateGameError {
    MissingMap,
    InvalidMapPath,
    InvalidMapData,
    InvalidMapName,
    InvalidMapHandle,
    MissingPlayerSetup,
    InvalidPlayerSetup,
    MultiplayerUnsupported,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Reasons a game could not be joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinGameError {
    MissingParticipation,
    InvalidObservedPlayerId,
    MissingOptions,
    MissingPorts,
    GameFull,
    LaunchError,
    FeatureUnsupported,
    NoSpaceForUser,
    MapDoesNotExist,
    CannotOpenMap,
    ChecksumError,
    NetworkError,
    OtherError,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CreateGameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl std::fmt::Display for JoinGameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
