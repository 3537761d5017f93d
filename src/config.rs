use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/todo/";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_LOG_FILE: &str = "todo-sync.log";

/// Settings for both binaries, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub toast_ttl: Duration,
    pub log_file: String,
    pub database_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let millis = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match lookup(key) {
                None => Ok(Duration::from_millis(default)),
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ConfigError::Invalid { key, value, reason: e.to_string() }),
            }
        };

        let bind = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind.clone(),
            reason: e.to_string(),
        })?;

        let api_url = get("TODO_API_URL", DEFAULT_API_URL);
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid { key: "TODO_API_URL", value: api_url, reason: "expected an http(s) URL".into() });
        }

        Ok(Self {
            api_url,
            request_timeout: millis("TODO_TIMEOUT_MS", 10_000)?,
            toast_ttl: millis("TODO_TOAST_MS", 2_000)?,
            log_file: get("TODO_LOG_FILE", DEFAULT_LOG_FILE),
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr,
        })
    }
}
