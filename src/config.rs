//! Command-line and environment configuration for both binaries.
//!
//! `.env` is loaded first by each binary, so every flag can also come from
//! the environment variable named next to it.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::infrastructure::reqwest_transport::ClientSettings;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "todo-tui", about = "Terminal client for a todo REST API")]
pub struct ClientConfig {
    /// Base URL of the todo API
    #[arg(long, env = "TODO_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Bearer token sent with every request (no Authorization header when unset)
    #[arg(long, env = "TODO_API_TOKEN")]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "TODO_API_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Write logs to this file; the terminal itself is taken by the UI
    #[arg(long, env = "TODO_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            bearer_token: self.token.clone().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "todo-server", about = "In-memory development backend for the todo API")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "TODO_SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Start with a few sample todos
    #[arg(long, env = "TODO_SERVER_SEED")]
    pub seed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn client_defaults_leave_auth_off() {
        let config = ClientConfig::try_parse_from(["todo-tui"]).unwrap();
        let settings = config.client_settings();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.bearer_token, None);
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn client_flags_override_defaults() {
        let config = ClientConfig::try_parse_from([
            "todo-tui", "--base-url", "http://api.test", "--token", "abc", "--timeout-secs", "3",
        ])
        .unwrap();
        let settings = config.client_settings();
        assert_eq!(settings.base_url, "http://api.test");
        assert_eq!(settings.bearer_token.as_deref(), Some("abc"));
        assert_eq!(settings.timeout, Duration::from_secs(3));
    }

    #[test]
    fn server_flags() {
        let config = ServerConfig::try_parse_from(["todo-server", "--addr", "0.0.0.0:8080", "--seed"]).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.seed);
    }
}
