pub mod clock;
pub mod coordinator;
pub mod rules;
pub mod settings;
pub mod utils;

use chess::Color;
use serde::Serialize;
use std::fmt;

// Re-export important types
pub use clock::{Clock, ClockState, Countdown};
pub use coordinator::{AbortCause, FinishReason, GameError, GamePhase, Progress, Seat, TurnCoordinator};
pub use rules::{InvalidMove, Outcome, RulesEngine, StandardRules};
pub use settings::{GameSettings, GameType, StartBoard};

/// One of the two competing players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::White, Side::Black];

    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Slot of this side in per-side arrays.
    pub fn index(self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::White => "white",
            Side::Black => "black",
        })
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}
