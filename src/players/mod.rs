pub mod greedy;
pub mod simpleton;
pub mod task;

use chess::{Board, ChessMove, MoveGen};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub use greedy::Greedy;
pub use simpleton::Simpleton;
pub use task::{PlayerTask, TurnError};

/// Longest uninterrupted sleep inside [`CancelToken::pause`].
const PAUSE_SLICE: Duration = Duration::from_millis(10);

/// Cancellation flag shared between a decision thread and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Sleep for `duration` in short slices. Returns `false` if cancelled
    /// before the time was up.
    pub fn pause(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(PAUSE_SLICE.min(deadline - now));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("decision cancelled")]
    Cancelled,
    #[error("no legal move available")]
    NoLegalMove,
    #[error("{0}")]
    Failed(String),
}

/// A player personality: picks the next move for the side to move.
///
/// Runs on its own thread. Long computations must check `cancel` and return
/// [`StrategyError::Cancelled`] once it is set.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn choose_move(
        &self,
        board: &Board,
        last_move: Option<ChessMove>,
        cancel: &CancelToken,
    ) -> Result<ChessMove, StrategyError>;
}

pub type PlayerFactory = fn() -> Arc<dyn Strategy>;

/// Registered personalities, the first being the default.
pub const PLAYERS: [(&str, PlayerFactory); 2] = [
    ("Simpleton", simpleton::create),
    ("Greedy", greedy::create),
];

pub fn player_names() -> Vec<&'static str> {
    PLAYERS.iter().map(|(name, _)| *name).collect()
}

pub fn lookup(name: &str) -> Option<PlayerFactory> {
    PLAYERS
        .iter()
        .find(|(registered, _)| registered.eq_ignore_ascii_case(name.trim()))
        .map(|(_, factory)| *factory)
}

/// Legal move picked by the position hash, so play varies between positions
/// without a random number generator.
pub(crate) fn hashed_choice(board: &Board) -> Option<ChessMove> {
    let moves: Vec<ChessMove> = MoveGen::new_legal(board).collect();
    if moves.is_empty() {
        return None;
    }
    let index = (board.get_hash() % moves.len() as u64) as usize;
    Some(moves[index])
}
