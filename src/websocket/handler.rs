use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::game::TurnCoordinator;
use crate::models::{AppState, ClientMessage, ServerMessage};

/// WebSocket connection running at most one game at a time.
pub struct GameSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
    pub game: Option<TurnCoordinator>,
}

impl Actor for GameSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let total_sessions = self.app_state.add_session(&self.id);
        info!("WebSocket connection started: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        // The interface loop: poll the running game and push what changed.
        let interval = self.app_state.config.poll_interval;
        ctx.run_interval(interval, |act, ctx| {
            if let Some(message) = act.poll_game() {
                act.send(ctx, &message);
            }
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.close_game();

        let total_sessions = self.app_state.remove_session(&self.id);
        info!("WebSocket connection closed: {}", self.id);
        info!("Total active sessions: {}", total_sessions);

        Running::Stop
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        let reply = self.handle_message(client_msg);
                        self.send(ctx, &reply);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.send(ctx, &ServerMessage::error(None, format!("Invalid message format: {}", e)));
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(ctx, &ServerMessage::error(None, "Binary messages are not supported"));
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl GameSocket {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            app_state,
            game: None,
        }
    }

    /// Reply to one client message.
    pub fn handle_message(&mut self, msg: ClientMessage) -> ServerMessage {
        match msg.message_type.as_str() {
            "start" => self.handle_start(msg),
            "end" => self.handle_end(),
            "time_sync" => self.handle_time_sync(),
            "options" => ServerMessage::options(),
            _ => {
                warn!("Unknown message type: {}", msg.message_type);
                ServerMessage::error(None, format!("Unknown message type: {}", msg.message_type))
            }
        }
    }

    pub fn send(&self, ctx: &mut ws::WebsocketContext<Self>, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Error serializing message: {}", e),
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let socket = GameSocket::new(app_state);
    info!("New WebSocket connection: {}", socket.id);
    ws::start(socket, &req, stream)
}
