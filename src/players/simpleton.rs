use chess::{Board, ChessMove};
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use super::{hashed_choice, CancelToken, Strategy, StrategyError};

/// Thinks for a fixed time, then plays any legal move.
#[derive(Debug, Clone)]
pub struct Simpleton {
    think_time: Duration,
}

impl Simpleton {
    pub const DEFAULT_THINK_TIME: Duration = Duration::from_secs(2);

    pub fn new(think_time: Duration) -> Self {
        Self { think_time }
    }
}

impl Default for Simpleton {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THINK_TIME)
    }
}

pub fn create() -> Arc<dyn Strategy> {
    Arc::new(Simpleton::default())
}

impl Strategy for Simpleton {
    fn name(&self) -> &str {
        "Simpleton"
    }

    fn choose_move(
        &self,
        board: &Board,
        _last_move: Option<ChessMove>,
        cancel: &CancelToken,
    ) -> Result<ChessMove, StrategyError> {
        debug!("Simpleton thinking for {:?}", self.think_time);
        if !cancel.pause(self.think_time) {
            return Err(StrategyError::Cancelled);
        }
        hashed_choice(board).ok_or(StrategyError::NoLegalMove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn plays_a_legal_move() {
        let board = Board::default();
        let mv = Simpleton::new(Duration::ZERO)
            .choose_move(&board, None, &CancelToken::new())
            .unwrap();
        assert!(board.legal(mv));
    }

    #[test]
    fn gives_up_when_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = Simpleton::default().choose_move(&Board::default(), None, &cancel);
        assert_eq!(result, Err(StrategyError::Cancelled));
    }

    #[test]
    fn no_move_in_mated_position() {
        let board = Board::from_str("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        let result = Simpleton::new(Duration::ZERO).choose_move(&board, None, &CancelToken::new());
        assert_eq!(result, Err(StrategyError::NoLegalMove));
    }
}
