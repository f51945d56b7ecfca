use log::warn;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_POLL_MS: u64 = 100;
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Server settings taken from `CHESS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    /// How often each connection polls its game.
    pub poll_interval: Duration,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unusable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(bind) = lookup("CHESS_BIND").filter(|v| !v.trim().is_empty()) {
            config.bind = bind.trim().to_string();
        }

        if let Some(raw) = lookup("CHESS_POLL_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.poll_interval = Duration::from_millis(ms),
                _ => warn!("Ignoring CHESS_POLL_MS={:?}, using {} ms", raw, DEFAULT_POLL_MS),
            }
        }

        if let Some(dir) = lookup("CHESS_STATIC_DIR").filter(|v| !v.trim().is_empty()) {
            config.static_dir = dir;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config(&[]), ServerConfig::default());
    }

    #[test]
    fn variables_override() {
        let cfg = config(&[
            ("CHESS_BIND", "0.0.0.0:9000"),
            ("CHESS_POLL_MS", "250"),
            ("CHESS_STATIC_DIR", "/srv/chess"),
        ]);
        assert_eq!(cfg.bind, "0.0.0.0:9000");
        assert_eq!(cfg.poll_interval, Duration::from_millis(250));
        assert_eq!(cfg.static_dir, "/srv/chess");
    }

    #[test]
    fn bad_poll_interval_falls_back() {
        assert_eq!(config(&[("CHESS_POLL_MS", "soon")]).poll_interval, Duration::from_millis(100));
        assert_eq!(config(&[("CHESS_POLL_MS", "0")]).poll_interval, Duration::from_millis(100));
    }
}
