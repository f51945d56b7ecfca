use serde::Serialize;

use crate::game::{GamePhase, Side};

/// Everything a view needs to draw a running or finished game.
#[derive(Serialize, Debug, Clone)]
pub struct GameSnapshot {
    pub game_id: String,
    pub phase: GamePhase,
    pub status: String,
    pub active_side: Side,
    pub white_player: String,
    pub black_player: String,
    /// `MM:SS`
    pub white_time: String,
    pub black_time: String,
    pub white_time_ms: u64,
    pub black_time_ms: u64,
    pub bonus_ms: u64,
    pub fen: String,
    /// Ranks 8 to 1.
    pub layout: Vec<String>,
    pub last_move: Option<String>,
    pub moves_played: usize,
}
