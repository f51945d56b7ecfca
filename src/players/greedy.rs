use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use super::{hashed_choice, CancelToken, Strategy, StrategyError};

/// Mates when it can, otherwise takes the most valuable piece on offer.
#[derive(Debug, Clone)]
pub struct Greedy {
    think_time: Duration,
}

impl Greedy {
    pub const DEFAULT_THINK_TIME: Duration = Duration::from_millis(500);

    pub fn new(think_time: Duration) -> Self {
        Self { think_time }
    }
}

impl Default for Greedy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THINK_TIME)
    }
}

pub fn create() -> Arc<dyn Strategy> {
    Arc::new(Greedy::default())
}

fn piece_value(piece: Piece) -> u32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight | Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::King => 0,
    }
}

impl Strategy for Greedy {
    fn name(&self) -> &str {
        "Greedy"
    }

    fn choose_move(
        &self,
        board: &Board,
        _last_move: Option<ChessMove>,
        cancel: &CancelToken,
    ) -> Result<ChessMove, StrategyError> {
        if !cancel.pause(self.think_time) {
            return Err(StrategyError::Cancelled);
        }

        let mut best: Option<(u32, ChessMove)> = None;
        for mv in MoveGen::new_legal(board) {
            if cancel.is_cancelled() {
                return Err(StrategyError::Cancelled);
            }
            if board.make_move_new(mv).status() == BoardStatus::Checkmate {
                debug!("Greedy found mate with {}", mv);
                return Ok(mv);
            }
            let gain = board.piece_on(mv.get_dest()).map_or(0, piece_value)
                + mv.get_promotion().map_or(0, piece_value);
            if gain > 0 && best.map_or(true, |(value, _)| gain > value) {
                best = Some((gain, mv));
            }
        }

        match best {
            Some((_, mv)) => Ok(mv),
            None => hashed_choice(board).ok_or(StrategyError::NoLegalMove),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn choose(fen: &str) -> ChessMove {
        let board = Board::from_str(fen).unwrap();
        Greedy::new(Duration::ZERO)
            .choose_move(&board, None, &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn takes_the_queen_over_the_pawn() {
        // Knight on d4 can take a pawn on c6 or a queen on e6.
        let mv = choose("4k3/8/2p1q3/8/3N4/8/8/K7 w - - 0 1");
        assert_eq!(mv, ChessMove::from_str("d4e6").unwrap());
    }

    #[test]
    fn prefers_mate() {
        let mv = choose("k7/8/1K6/8/8/8/8/6Q1 w - - 0 1");
        assert_eq!(mv, ChessMove::from_str("g1g8").unwrap());
    }

    #[test]
    fn quiet_position_still_moves() {
        let board = Board::default();
        let mv = Greedy::new(Duration::ZERO)
            .choose_move(&board, None, &CancelToken::new())
            .unwrap();
        assert!(board.legal(mv));
    }
}
