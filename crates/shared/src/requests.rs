//! Request messages (client → game)

use serde::{Deserialize, Serialize};

/// Messages the client sends to the game process.
///
/// Each request produces exactly one response, delivered in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Create a new game on a local or Battle.net map
    CreateGame { settings: CreateGameSettings },
    /// Join the game created with `CreateGame`
    JoinGame { settings: JoinGameSettings },
    /// Leave the current game without shutting down the process
    LeaveGame,
    /// Liveness check; also reports version information
    Ping,
    /// List maps the process can load
    AvailableMaps,
    /// Advance a non-realtime game by `count` game loops
    Step {
        #[serde(default = "default_step_count")]
        count: u32,
    },
    /// Shut the process down. No response is expected to be consumed.
    Quit,
}

fn default_step_count() -> u32 {
    1
}

/// Map to load when creating a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapSource {
    /// Path to a map file on the game host
    LocalMap { path: String },
    /// Name of a published Battle.net map
    BattlenetMap { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGameSettings {
    pub map: MapSource,
    pub players: Vec<PlayerSetup>,
    #[serde(default)]
    pub disable_fog: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<u32>,
    #[serde(default)]
    pub realtime: bool,
}

impl CreateGameSettings {
    pub fn new(map: MapSource) -> Self {
        Self {
            map,
            players: Vec::new(),
            disable_fog: false,
            random_seed: None,
            realtime: false,
        }
    }

    pub fn with_player(mut self, player: PlayerSetup) -> Self {
        self.players.push(player);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    Participant,
    Computer,
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    Terran,
    Zerg,
    Protoss,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    MediumHard,
    Hard,
    Harder,
    VeryHard,
    CheatVision,
    CheatMoney,
    CheatInsane,
}

/// One slot in a game being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub kind: PlayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<Race>,
    /// Only meaningful for `PlayerKind::Computer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl PlayerSetup {
    pub fn participant(race: Race) -> Self {
        Self {
            kind: PlayerKind::Participant,
            race: Some(race),
            difficulty: None,
        }
    }

    pub fn computer(race: Race, difficulty: Difficulty) -> Self {
        Self {
            kind: PlayerKind::Computer,
            race: Some(race),
            difficulty: Some(difficulty),
        }
    }

    pub fn observer() -> Self {
        Self {
            kind: PlayerKind::Observer,
            race: None,
            difficulty: None,
        }
    }
}

/// Which observation data the game should include in its responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceOptions {
    #[serde(default)]
    pub raw: bool,
    #[serde(default)]
    pub score: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGameSettings {
    /// Race to play; `None` joins as an observer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<Race>,
    /// Player to observe when joining without a race
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_player_id: Option<u32>,
    #[serde(default)]
    pub options: InterfaceOptions,
}

impl JoinGameSettings {
    pub fn as_race(race: Race) -> Self {
        Self {
            race: Some(race),
            observed_player_id: None,
            options: InterfaceOptions::default(),
        }
    }

    pub fn as_observer(observed_player_id: u32) -> Self {
        Self {
            race: None,
            observed_player_id: Some(observed_player_id),
            options: InterfaceOptions::default(),
        }
    }
}

impl Request {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::CreateGame { .. } => "create_game",
            Request::JoinGame { .. } => "join_game",
            Request::LeaveGame => "leave_game",
            Request::Ping => "ping",
            Request::AvailableMaps => "available_maps",
            Request::Step { .. } => "step",
            Request::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_requests_are_tagged_by_type() {
        let json = serde_json::to_value(Request::Ping).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "ping" }));
    }

    #[test]
    fn step_count_defaults_to_one() {
        let request: Request = serde_json::from_str(r#"{"type":"step"}"#).unwrap();
        assert_eq!(request, Request::Step { count: 1 });
    }

    #[test]
    fn create_game_wire_shape() {
        let settings = CreateGameSettings::new(MapSource::LocalMap {
            path: "Ladder/Acropolis.SC2Map".into(),
        })
        .with_player(PlayerSetup::participant(Race::Zerg))
        .with_player(PlayerSetup::computer(Race::Terran, Difficulty::Hard));

        let json = serde_json::to_value(Request::CreateGame { settings }).unwrap();
        assert_eq!(json["type"], "create_game");
        assert_eq!(json["settings"]["map"]["kind"], "local_map");
        assert_eq!(json["settings"]["players"][1]["difficulty"], "hard");
        assert!(json["settings"].get("random_seed").is_none());
    }
}
