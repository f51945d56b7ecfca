use chess::{Board, ChessMove};
use futures::channel::oneshot;
use log::{debug, warn};
use std::sync::Arc;
use std::thread;

use super::{CancelToken, Strategy, StrategyError};
use crate::game::Side;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("{player} already has a turn in progress")]
    TurnAlreadyInProgress { player: String },
    #[error("{player} has not finished its turn")]
    TurnNotReady { player: String },
    #[error("{player} ({side}) faulted: {reason}")]
    PlayerFaulted {
        player: String,
        side: Side,
        reason: String,
    },
}

type Decision = Result<ChessMove, StrategyError>;

/// A decision thread and what it has reported so far.
struct Turn {
    cancel: CancelToken,
    receiver: oneshot::Receiver<Decision>,
    handle: thread::JoinHandle<()>,
    outcome: Option<Result<ChessMove, String>>,
}

/// One player's identity and its in-flight decision, if any.
pub struct PlayerTask {
    name: String,
    side: Side,
    strategy: Arc<dyn Strategy>,
    turn: Option<Turn>,
    // Cancelled threads that had not exited yet when killed.
    retired: Vec<thread::JoinHandle<()>>,
}

impl PlayerTask {
    pub fn new(name: impl Into<String>, side: Side, strategy: Arc<dyn Strategy>) -> Self {
        Self {
            name: name.into(),
            side,
            strategy,
            turn: None,
            retired: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Whether a turn has been started and its move not yet taken.
    pub fn is_thinking(&self) -> bool {
        self.turn.is_some()
    }

    /// Start deciding a move on a new thread.
    pub fn start_turn(&mut self, board: Board, last_move: Option<ChessMove>) -> Result<(), TurnError> {
        if self.turn.is_some() {
            return Err(TurnError::TurnAlreadyInProgress {
                player: self.name.clone(),
            });
        }
        self.reap();

        let cancel = CancelToken::new();
        let (sender, receiver) = oneshot::channel();
        let strategy = self.strategy.clone();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("{}-turn", self.side))
            .spawn(move || {
                let decision = strategy.choose_move(&board, last_move, &token);
                // The receiver is gone once the turn was killed.
                let _ = sender.send(decision);
            })
            .map_err(|e| self.fault(format!("cannot spawn decision thread: {}", e)))?;

        debug!("{} started thinking", self.name);
        self.turn = Some(Turn {
            cancel,
            receiver,
            handle,
            outcome: None,
        });
        Ok(())
    }

    /// Non-blocking check whether the current turn has finished, with a move
    /// or with a fault. `false` when no turn is running.
    pub fn poll_done(&mut self) -> bool {
        let Some(turn) = self.turn.as_mut() else {
            return false;
        };
        if turn.outcome.is_some() {
            return true;
        }

        let outcome = match turn.receiver.try_recv() {
            Ok(None) => return false,
            Ok(Some(Ok(mv))) => Ok(mv),
            Ok(Some(Err(e))) => Err(e.to_string()),
            // Sender dropped without a decision: the strategy panicked.
            Err(oneshot::Canceled) => Err("decision thread died without a move".to_string()),
        };
        turn.outcome = Some(outcome);
        true
    }

    /// Take the finished turn's move, ending the turn.
    pub fn take_move(&mut self) -> Result<ChessMove, TurnError> {
        if !self.poll_done() {
            return Err(TurnError::TurnNotReady {
                player: self.name.clone(),
            });
        }
        let Some(turn) = self.turn.take() else {
            return Err(TurnError::TurnNotReady {
                player: self.name.clone(),
            });
        };

        // The thread has sent its decision (or unwound), so this is immediate.
        if turn.handle.join().is_err() {
            warn!("{} decision thread panicked", self.name);
        }

        match turn.outcome {
            Some(Ok(mv)) => Ok(mv),
            Some(Err(reason)) => Err(self.fault(reason)),
            None => Err(TurnError::TurnNotReady {
                player: self.name.clone(),
            }),
        }
    }

    /// Cancel the current turn, if any, without waiting for its thread.
    pub fn kill(&mut self) {
        if let Some(turn) = self.turn.take() {
            turn.cancel.cancel();
            debug!("{} turn cancelled", self.name);
            if turn.handle.is_finished() {
                let _ = turn.handle.join();
            } else {
                self.retired.push(turn.handle);
            }
        }
        self.reap();
    }

    fn reap(&mut self) {
        let (finished, running): (Vec<_>, Vec<_>) =
            self.retired.drain(..).partition(|handle| handle.is_finished());
        for handle in finished {
            let _ = handle.join();
        }
        self.retired = running;
    }

    fn fault(&self, reason: String) -> TurnError {
        TurnError::PlayerFaulted {
            player: self.name.clone(),
            side: self.side,
            reason,
        }
    }
}

impl Drop for PlayerTask {
    fn drop(&mut self) {
        self.kill();
        // Cancelled strategies exit at their next check of the token.
        for handle in self.retired.drain(..) {
            let _ = handle.join();
        }
    }
}
