use chess::{Board, ChessMove};
use log::{debug, info, warn};
use serde::Serialize;
use std::io;
use std::sync::Arc;
use uuid::Uuid;

use super::clock::{Clock, Countdown};
use super::rules::{Outcome, RulesEngine};
use super::settings::GameSettings;
use super::utils::{board_rows, format_clock, game_status};
use super::Side;
use crate::models::GameSnapshot;
use crate::players::{PlayerFactory, PlayerTask, Strategy, TurnError};

/// Where the coordinator's state machine currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GamePhase {
    AwaitingMove { side: Side },
    ApplyingMove,
    Finished { reason: FinishReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FinishReason {
    /// The rules ended the game.
    Rules { outcome: Outcome },
    /// `side` ran out of time.
    Timeout { side: Side },
    Aborted { cause: AbortCause },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum AbortCause {
    /// Ended from outside.
    Requested,
    PlayerFaulted {
        side: Side,
        player: String,
        reason: String,
    },
    InvalidMove {
        side: Side,
        player: String,
        mv: String,
    },
    /// Broken turn sequencing inside the coordinator.
    Internal { reason: String },
}

/// What one poll did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Nothing to update yet.
    Waiting,
    /// `side` played `mv`; the opponent is thinking now.
    Moved { side: Side, mv: ChessMove },
    Finished(FinishReason),
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to start countdown thread: {0}")]
    Countdown(#[from] io::Error),
    #[error("failed to start the first turn: {0}")]
    FirstTurn(#[from] TurnError),
}

/// A player taking part in a game.
pub struct Seat {
    pub name: String,
    pub strategy: Arc<dyn Strategy>,
}

impl Seat {
    pub fn new(name: impl Into<String>, strategy: Arc<dyn Strategy>) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }

    /// Seat named after the personality and the side it plays.
    pub fn from_factory(factory: PlayerFactory, side: Side) -> Self {
        let strategy = factory();
        Self::new(format!("{} ({})", strategy.name(), side), strategy)
    }
}

/// Drives one game from White's first move to its end.
///
/// Every method returns without waiting on a player. The board is touched only
/// from the caller's thread; the clock is shared with the countdown thread.
pub struct TurnCoordinator {
    id: String,
    board: Board,
    rules: Box<dyn RulesEngine>,
    clock: Clock,
    countdown: Option<Countdown>,
    players: [PlayerTask; 2],
    phase: GamePhase,
    last_move: Option<ChessMove>,
    moves_played: usize,
}

impl TurnCoordinator {
    /// Create a game and start White thinking.
    pub fn new(
        settings: GameSettings,
        rules: impl RulesEngine + 'static,
        white: Seat,
        black: Seat,
    ) -> Result<Self, GameError> {
        let total_ms = settings.time_per_side.as_millis() as u64;
        let bonus_ms = settings.bonus.as_millis() as u64;
        let clock = Clock::new(total_ms, bonus_ms);

        let mut players = [
            PlayerTask::new(white.name, Side::White, white.strategy),
            PlayerTask::new(black.name, Side::Black, black.strategy),
        ];
        players[Side::White.index()].start_turn(settings.start_board, None)?;

        let countdown = match settings.tick_interval {
            Some(interval) => Some(Countdown::start(clock.clone(), interval)?),
            None => None,
        };

        let id = Uuid::new_v4().to_string();
        info!(
            "Game {} started: {} vs {}, {} ms + {} ms per move",
            id,
            players[0].name(),
            players[1].name(),
            total_ms,
            bonus_ms
        );

        Ok(Self {
            id,
            board: settings.start_board,
            rules: Box::new(rules),
            clock,
            countdown,
            players,
            phase: GamePhase::AwaitingMove { side: Side::White },
            last_move: None,
            moves_played: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    pub fn finish_reason(&self) -> Option<&FinishReason> {
        match &self.phase {
            GamePhase::Finished { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn active_side(&self) -> Side {
        self.clock.active()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, side: Side) -> &PlayerTask {
        &self.players[side.index()]
    }

    pub fn last_move(&self) -> Option<ChessMove> {
        self.last_move
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Whether [`Self::poll`] has something to do: a fallen flag or a
    /// finished turn.
    pub fn check(&mut self) -> bool {
        match self.phase {
            GamePhase::AwaitingMove { side } => {
                self.clock.is_expired() || self.players[side.index()].poll_done()
            }
            _ => false,
        }
    }

    /// Advance the game if the clock ran out or the active player has moved.
    pub fn poll(&mut self) -> Progress {
        let side = match &self.phase {
            GamePhase::AwaitingMove { side } => *side,
            GamePhase::Finished { reason } => return Progress::Finished(reason.clone()),
            GamePhase::ApplyingMove => {
                return self.abort(AbortCause::Internal {
                    reason: "poll during move application".to_string(),
                })
            }
        };

        // A fallen flag wins over a move that happens to be ready.
        if let Some(flagged) = self.clock.expired_side() {
            return self.finish(FinishReason::Timeout { side: flagged });
        }

        if !self.players[side.index()].poll_done() {
            return Progress::Waiting;
        }

        self.phase = GamePhase::ApplyingMove;
        self.apply_turn(side)
    }

    fn apply_turn(&mut self, side: Side) -> Progress {
        let mv = match self.players[side.index()].take_move() {
            Ok(mv) => mv,
            Err(TurnError::PlayerFaulted {
                player,
                side,
                reason,
            }) => {
                warn!("Game {}: {} faulted: {}", self.id, player, reason);
                return self.abort(AbortCause::PlayerFaulted {
                    side,
                    player,
                    reason,
                });
            }
            Err(e) => {
                return self.abort(AbortCause::Internal {
                    reason: e.to_string(),
                })
            }
        };

        let mut board = self.board;
        if let Err(e) = self.rules.apply(&mut board, mv) {
            warn!("Game {}: {}", self.id, e);
            let player = self.players[side.index()].name().to_string();
            return self.abort(AbortCause::InvalidMove {
                side,
                player,
                mv: mv.to_string(),
            });
        }
        self.board = board;
        self.last_move = Some(mv);
        self.moves_played += 1;
        debug!("Game {}: {} played {}", self.id, side, mv);

        let next = self.clock.pass_turn(side);

        if let Some(outcome) = self.rules.is_game_over(&self.board) {
            return self.finish(FinishReason::Rules { outcome });
        }

        if let Err(e) = self.players[next.index()].start_turn(self.board, Some(mv)) {
            return match e {
                TurnError::PlayerFaulted {
                    player,
                    side,
                    reason,
                } => self.abort(AbortCause::PlayerFaulted {
                    side,
                    player,
                    reason,
                }),
                other => self.abort(AbortCause::Internal {
                    reason: other.to_string(),
                }),
            };
        }

        self.phase = GamePhase::AwaitingMove { side: next };
        Progress::Moved { side, mv }
    }

    /// End the game from outside. Returns the final reason, which is the
    /// earlier one if the game had already finished.
    pub fn end(&mut self) -> FinishReason {
        if let Some(reason) = self.finish_reason() {
            return reason.clone();
        }
        let reason = FinishReason::Aborted {
            cause: AbortCause::Requested,
        };
        self.finish(reason.clone());
        reason
    }

    fn abort(&mut self, cause: AbortCause) -> Progress {
        self.finish(FinishReason::Aborted { cause })
    }

    fn finish(&mut self, reason: FinishReason) -> Progress {
        for player in self.players.iter_mut() {
            player.kill();
        }
        if let Some(mut countdown) = self.countdown.take() {
            countdown.stop();
        }

        info!("Game {} finished after {} moves: {:?}", self.id, self.moves_played, reason);
        self.phase = GamePhase::Finished {
            reason: reason.clone(),
        };
        Progress::Finished(reason)
    }

    /// Read-only view for display.
    pub fn snapshot(&self) -> GameSnapshot {
        let clock = self.clock.snapshot();
        let white_ms = clock.remaining(Side::White);
        let black_ms = clock.remaining(Side::Black);

        GameSnapshot {
            game_id: self.id.clone(),
            phase: self.phase.clone(),
            status: game_status(&self.phase, &self.board),
            active_side: clock.active(),
            white_player: self.players[Side::White.index()].name().to_string(),
            black_player: self.players[Side::Black.index()].name().to_string(),
            white_time: format_clock(white_ms),
            black_time: format_clock(black_ms),
            white_time_ms: white_ms,
            black_time_ms: black_ms,
            bonus_ms: clock.bonus(),
            fen: self.board.to_string(),
            layout: board_rows(&self.board),
            last_move: self.last_move.map(|mv| mv.to_string()),
            moves_played: self.moves_played,
        }
    }
}

impl Drop for TurnCoordinator {
    fn drop(&mut self) {
        if !self.is_finished() {
            self.end();
        }
    }
}
