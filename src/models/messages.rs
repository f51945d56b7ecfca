use serde::{Deserialize, Serialize};

use super::GameSnapshot;
use crate::game::settings::{GameType, StartBoard, BONUS_CHOICES, DEFAULT_BONUS_SECS};
use crate::game::{FinishReason, GameSettings, Side};
use crate::players::{self, PlayerFactory};

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ClientMessage {
    pub message_type: String,
    pub white_player: Option<String>,
    pub black_player: Option<String>,
    pub game_type: Option<String>,
    pub time_bonus: Option<String>,
    pub start_board: Option<String>,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerMessage {
    pub message_type: String,
    pub game_id: Option<String>,
    pub snapshot: Option<serde_json::Value>,
    pub reason: Option<serde_json::Value>,
    pub options: Option<GameOptions>,
    pub error: Option<String>,
}

impl ServerMessage {
    fn empty(message_type: &str) -> Self {
        Self {
            message_type: message_type.to_string(),
            game_id: None,
            snapshot: None,
            reason: None,
            options: None,
            error: None,
        }
    }

    pub fn error(game_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            game_id,
            error: Some(error.into()),
            ..Self::empty("error")
        }
    }

    /// `clock`, `move_made` and `game_started` updates.
    pub fn snapshot(message_type: &str, snapshot: &GameSnapshot) -> Self {
        Self {
            game_id: Some(snapshot.game_id.clone()),
            snapshot: serde_json::to_value(snapshot).ok(),
            ..Self::empty(message_type)
        }
    }

    pub fn finished(snapshot: &GameSnapshot, reason: &FinishReason) -> Self {
        Self {
            reason: serde_json::to_value(reason).ok(),
            ..Self::snapshot("game_finished", snapshot)
        }
    }

    pub fn options() -> Self {
        Self {
            options: Some(GameOptions::current()),
            ..Self::empty("options")
        }
    }
}

/// The choices a client can offer when starting a game.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    pub players: Vec<String>,
    pub game_types: Vec<String>,
    pub time_bonuses: Vec<u64>,
    pub start_boards: Vec<String>,
}

impl GameOptions {
    pub fn current() -> Self {
        Self {
            players: players::player_names().into_iter().map(String::from).collect(),
            game_types: GameType::ALL.iter().map(|t| t.label().to_string()).collect(),
            time_bonuses: BONUS_CHOICES.to_vec(),
            start_boards: StartBoard::ALL.iter().map(|b| b.label().to_string()).collect(),
        }
    }
}

/// Every problem found in a `start` request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Some game parameters have invalid values: {}", .problems.join("; "))]
pub struct SettingsError {
    pub problems: Vec<String>,
}

/// A validated `start` request.
pub struct GameRequest {
    pub white: PlayerFactory,
    pub black: PlayerFactory,
    pub settings: GameSettings,
}

impl ClientMessage {
    /// Validate the game parameters of a `start` message. Missing fields take
    /// their defaults; every invalid field is reported.
    pub fn game_request(&self) -> Result<GameRequest, SettingsError> {
        let mut problems = Vec::new();
        let default_player = players::PLAYERS[0].1;

        let mut player = |field: &Option<String>, side: Side| match field {
            None => Some(default_player),
            Some(name) => {
                let found = players::lookup(name);
                if found.is_none() {
                    problems.push(format!("Unknown {} player \"{}\"", side, name));
                }
                found
            }
        };
        let white = player(&self.white_player, Side::White);
        let black = player(&self.black_player, Side::Black);

        let game_type = match &self.game_type {
            None => Some(GameType::default()),
            Some(name) => {
                let found = GameType::parse(name);
                if found.is_none() {
                    problems.push(format!("Unknown game type \"{}\"", name));
                }
                found
            }
        };

        let start_board = match &self.start_board {
            None => Some(StartBoard::default()),
            Some(name) => {
                let found = StartBoard::parse(name);
                if found.is_none() {
                    problems.push(format!("Unknown start board \"{}\"", name));
                }
                found
            }
        };

        let bonus = match &self.time_bonus {
            None => Some(DEFAULT_BONUS_SECS),
            Some(value) => {
                let parsed = value.trim().parse::<u64>().ok();
                if parsed.is_none() {
                    problems.push(format!("Invalid time bonus value \"{}\"", value));
                }
                parsed
            }
        };

        match (white, black, game_type, start_board, bonus) {
            (Some(white), Some(black), Some(game_type), Some(start_board), Some(bonus))
                if problems.is_empty() =>
            {
                Ok(GameRequest {
                    white,
                    black,
                    settings: GameSettings::new(game_type, bonus, start_board),
                })
            }
            _ => Err(SettingsError { problems }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn start() -> ClientMessage {
        ClientMessage {
            message_type: "start".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let request = start().game_request().unwrap();
        assert_eq!(request.settings.time_per_side, Duration::from_secs(10));
        assert_eq!(request.settings.bonus, Duration::from_secs(10));
        assert_eq!((request.white)().name(), "Simpleton");
    }

    #[test]
    fn full_request() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"message_type":"start","white_player":"Greedy","black_player":"Simpleton",
                "game_type":"Blitz (5 min)","time_bonus":"5","start_board":"Normal"}"#,
        )
        .unwrap();
        let request = msg.game_request().unwrap();
        assert_eq!(request.settings.time_per_side, Duration::from_secs(300));
        assert_eq!(request.settings.bonus, Duration::from_secs(5));
        assert_eq!((request.white)().name(), "Greedy");
        assert_eq!((request.black)().name(), "Simpleton");
    }

    #[test]
    fn every_problem_is_reported() {
        let msg = ClientMessage {
            white_player: Some("Kasparov".to_string()),
            black_player: Some("Karpov".to_string()),
            game_type: Some("Marathon".to_string()),
            time_bonus: Some("-3".to_string()),
            start_board: Some("Chess960".to_string()),
            ..start()
        };
        let err = msg.game_request().err().unwrap();
        assert_eq!(
            err.problems,
            vec![
                "Unknown white player \"Kasparov\"",
                "Unknown black player \"Karpov\"",
                "Unknown game type \"Marathon\"",
                "Unknown start board \"Chess960\"",
                "Invalid time bonus value \"-3\"",
            ]
        );
        assert!(err.to_string().starts_with("Some game parameters have invalid values"));
    }

    #[test]
    fn options_list_choices() {
        let options = GameOptions::current();
        assert_eq!(options.players, vec!["Simpleton", "Greedy"]);
        assert_eq!(options.game_types[2], "Blitz (5 min)");
        assert_eq!(options.time_bonuses, vec![1, 5, 10, 0]);
        assert_eq!(options.start_boards, vec!["Normal"]);
    }

    #[test]
    fn error_message_shape() {
        let json = serde_json::to_value(ServerMessage::error(None, "No game running")).unwrap();
        assert_eq!(json["message_type"], "error");
        assert_eq!(json["error"], "No game running");
        assert!(json["game_id"].is_null());
    }
}
