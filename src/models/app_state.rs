use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::config::ServerConfig;

/// Application state shared between connections
pub struct AppState {
    pub config: ServerConfig,
    sessions: Mutex<HashSet<String>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashSet::new()),
        }
    }

    /// Register a connection, returning the number of open sessions.
    pub fn add_session(&self, id: &str) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(id.to_string());
        sessions.len()
    }

    pub fn remove_session(&self, id: &str) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(id);
        sessions.len()
    }
}
