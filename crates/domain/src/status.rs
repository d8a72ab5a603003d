//! Lifecycle state reported by the remote game process.
//!
//! Every response carries the status the game was in when it produced the
//! response. The client keeps the most recently drained one around so polling
//! loops can wait for a game to start or end.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Game process is up and waiting for a game to be created
    Launched,
    /// A game has been created and is waiting for players to join
    InitGame,
    /// A game is running
    InGame,
    /// A replay is being played back
    InReplay,
    /// The game or replay finished
    Ended,
    /// The process is shutting down
    Quit,
    /// Forward-compatibility fallback for newer variants.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Status {
    /// Convert to u8 for atomic storage.
    pub fn to_u8(self) -> u8 {
        match self {
            Status::Launched => 1,
            Status::InitGame => 2,
            Status::InGame => 3,
            Status::InReplay => 4,
            Status::Ended => 5,
            Status::Quit => 6,
            Status::Unknown => 99,
        }
    }

    /// Convert from u8 (atomic storage).
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Status::Launched,
            2 => Status::InitGame,
            3 => Status::InGame,
            4 => Status::InReplay,
            5 => Status::Ended,
            6 => Status::Quit,
            _ => Status::Unknown,
        }
    }

    /// Whether a game or replay is loaded.
    pub fn is_in_game(self) -> bool {
        matches!(self, Status::InGame | Status::InReplay)
    }

    /// Whether the game has finished or the process is going away.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Ended | Status::Quit)
    }

    fn as_str(self) -> &'static str {
        match self {
            Status::Launched => "launched",
            Status::InitGame => "init_game",
            Status::InGame => "in_game",
            Status::InReplay => "in_replay",
            Status::Ended => "ended",
            Status::Quit => "quit",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_u8_roundtrip() {
        let statuses = [
            Status::Launched,
            Status::InitGame,
            Status::InGame,
            Status::InReplay,
            Status::Ended,
            Status::Quit,
            Status::Unknown,
        ];

        for status in statuses {
            assert_eq!(Status::from_u8(status.to_u8()), status);
        }
    }

    #[test]
    fn unrecognized_wire_value_maps_to_unknown() {
        let status: Status = serde_json::from_str("\"paused_forever\"").unwrap();
        assert_eq!(status, Status::Unknown);
    }

    #[test]
    fn terminal_states() {
        assert!(Status::Ended.is_terminal());
        assert!(Status::Quit.is_terminal());
        assert!(!Status::InGame.is_terminal());
        assert!(Status::InReplay.is_in_game());
    }

    #[test]
    fn display_matches_wire_name() {
        for status in [Status::InitGame, Status::InReplay, Status::Unknown] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{status}\""));
        }
    }
}
