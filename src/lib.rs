//! Clock and turn coordination for games between computer chess players.
//!
//! The [`game::TurnCoordinator`] owns both players and the shared clock. An
//! interface loop polls it; the players think on their own threads.

pub mod config;
pub mod game;
pub mod models;
pub mod players;
pub mod routes;
pub mod websocket;
