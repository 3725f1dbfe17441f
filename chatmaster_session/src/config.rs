//! Per-server connection settings and session-wide chat settings

use serde::{Deserialize, Serialize};

/// Port used when a server config doesn't name one
pub const DEFAULT_PORT: u16 = 6667;

/// One configured server identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: String,
    pub port: Option<u16>,
    pub nick: String,
    pub username: String,
    pub real_name: String,
    pub password: String,
    pub ssl: bool,
    pub self_signed: bool,
    pub sasl: bool,
}

impl ServerConfig {
    /// The port to connect to; unset or zero means the default
    pub fn port_or_default(&self) -> u16 {
        match self.port {
            None | Some(0) => DEFAULT_PORT,
            Some(port) => port,
        }
    }

    /// The server password, if one was given
    pub fn password(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(&self.password)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: None,
            nick: String::new(),
            username: String::new(),
            real_name: String::new(),
            password: String::new(),
            ssl: false,
            self_signed: false,
            sasl: false,
        }
    }
}

/// Settings shared by every connection in a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub flood_protection: bool,
    /// Milliseconds between lines when flood protection is on
    pub flood_protection_delay: u64,
    pub strip_colors: bool,
    /// Channels whose transcripts shouldn't be written to disk
    pub log_exclude: Vec<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            flood_protection: true,
            flood_protection_delay: 1000,
            strip_colors: false,
            log_exclude: Vec::new(),
        }
    }
}
