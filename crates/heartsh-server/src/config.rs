//! Server configuration.

use std::{path::PathBuf, time::Duration};

use crate::ServerError;

/// Configuration for the SSH server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host name or address to listen on.
    pub host: String,
    /// TCP port to listen on. `0` picks a free port.
    pub port: u16,
    /// ed25519 host key, generated here if missing.
    pub host_key_path: PathBuf,
    /// Banner shown in every session.
    pub asset_path: PathBuf,
    /// How long shutdown waits for sessions before aborting them.
    pub shutdown_timeout: Duration,
    /// Clock refresh period of each session.
    pub tick_interval: Duration,
    /// Delay before answering a rejected authentication attempt.
    pub auth_rejection_time: Duration,
}

impl ServerConfig {
    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.host.is_empty() {
            return Err(ServerError::Config("host must not be empty".to_string()));
        }
        if self.tick_interval.is_zero() {
            return Err(ServerError::Config("tick interval must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23234,
            host_key_path: PathBuf::from(".ssh/term_info_ed25519"),
            asset_path: PathBuf::from("assets/heart.txt"),
            shutdown_timeout: Duration::from_secs(30),
            tick_interval: Duration::from_secs(1),
            auth_rejection_time: Duration::from_secs(3),
        }
    }
}
