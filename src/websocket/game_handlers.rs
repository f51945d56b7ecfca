use log::{info, warn};

use super::handler::GameSocket;
use crate::game::{FinishReason, Progress, Seat, Side, StandardRules, TurnCoordinator};
use crate::models::{ClientMessage, ServerMessage};

impl GameSocket {
    pub fn handle_start(&mut self, msg: ClientMessage) -> ServerMessage {
        if let Some(game) = &self.game {
            warn!("Connection {} already runs game {}", self.id, game.id());
            return ServerMessage::error(Some(game.id().to_string()), "A game is already running");
        }

        let request = match msg.game_request() {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected game parameters: {}", e);
                return ServerMessage::error(None, e.to_string());
            }
        };

        let white = Seat::from_factory(request.white, Side::White);
        let black = Seat::from_factory(request.black, Side::Black);
        match TurnCoordinator::new(request.settings, StandardRules, white, black) {
            Ok(game) => {
                info!("Connection {} started game {}", self.id, game.id());
                let reply = ServerMessage::snapshot("game_started", &game.snapshot());
                self.game = Some(game);
                reply
            }
            Err(e) => {
                warn!("Could not start game: {}", e);
                ServerMessage::error(None, format!("Could not start game: {}", e))
            }
        }
    }

    pub fn handle_end(&mut self) -> ServerMessage {
        match self.game.take() {
            Some(mut game) => {
                let reason = game.end();
                ServerMessage::finished(&game.snapshot(), &reason)
            }
            None => ServerMessage::error(None, "No game running"),
        }
    }

    pub fn handle_time_sync(&self) -> ServerMessage {
        match &self.game {
            Some(game) => ServerMessage::snapshot("time_sync", &game.snapshot()),
            None => ServerMessage::error(None, "No game running"),
        }
    }

    /// One turn of the interface loop. A finished game is dropped from the
    /// connection after its final message.
    pub fn poll_game(&mut self) -> Option<ServerMessage> {
        let game = self.game.as_mut()?;

        let message = match game.poll() {
            Progress::Waiting => ServerMessage::snapshot("clock", &game.snapshot()),
            Progress::Moved { .. } => ServerMessage::snapshot("move_made", &game.snapshot()),
            Progress::Finished(reason) => {
                let message = ServerMessage::finished(&game.snapshot(), &reason);
                self.game = None;
                message
            }
        };
        Some(message)
    }

    /// End whatever game the connection runs; used when it closes.
    pub fn close_game(&mut self) -> Option<FinishReason> {
        let mut game = self.game.take()?;
        info!("Connection {} closed, ending game {}", self.id, game.id());
        Some(game.end())
    }
}
