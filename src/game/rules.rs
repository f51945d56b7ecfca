use chess::{Board, BoardStatus, ChessMove, Color, Piece};
use serde::Serialize;

use super::Side;

/// How the rules ended a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Checkmate { winner: Side },
    Stalemate,
    InsufficientMaterial,
}

/// A move the rules engine refused to apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal move {mv} in position {fen}")]
pub struct InvalidMove {
    pub mv: ChessMove,
    pub fen: String,
}

/// Move legality and game-end detection, consumed by the coordinator.
pub trait RulesEngine: Send {
    /// Apply `mv` to `board`, leaving it untouched on error.
    fn apply(&self, board: &mut Board, mv: ChessMove) -> Result<(), InvalidMove>;

    fn is_game_over(&self, board: &Board) -> Option<Outcome>;
}

/// Standard chess rules, backed by the `chess` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn apply(&self, board: &mut Board, mv: ChessMove) -> Result<(), InvalidMove> {
        if !board.legal(mv) {
            return Err(InvalidMove {
                mv,
                fen: board.to_string(),
            });
        }
        *board = board.make_move_new(mv);
        Ok(())
    }

    fn is_game_over(&self, board: &Board) -> Option<Outcome> {
        match board.status() {
            BoardStatus::Checkmate => Some(Outcome::Checkmate {
                winner: Side::from(!board.side_to_move()),
            }),
            BoardStatus::Stalemate => Some(Outcome::Stalemate),
            BoardStatus::Ongoing if has_insufficient_material(board) => {
                Some(Outcome::InsufficientMaterial)
            }
            BoardStatus::Ongoing => None,
        }
    }
}

fn count(board: &Board, piece: Piece, color: Color) -> u32 {
    (*board.pieces(piece) & *board.color_combined(color)).popcnt()
}

/// Non-king material of one side as (heavy pieces and pawns, minor pieces).
fn material(board: &Board, color: Color) -> (u32, u32) {
    let heavy = count(board, Piece::Pawn, color)
        + count(board, Piece::Rook, color)
        + count(board, Piece::Queen, color);
    let minor = count(board, Piece::Knight, color) + count(board, Piece::Bishop, color);
    (heavy, minor)
}

/// Check if the board has insufficient material for checkmate: bare kings,
/// or a bare king against a king and one minor piece.
pub fn has_insufficient_material(board: &Board) -> bool {
    let white = material(board, Color::White);
    let black = material(board, Color::Black);

    match (white, black) {
        ((0, 0), (0, minor)) | ((0, minor), (0, 0)) => minor <= 1,
        _ => false,
    }
}
