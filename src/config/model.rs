//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a sensible default so the daemon starts without a file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration for a single IRC network connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network identifier passed to the notification command (e.g. `"libera"`).
    pub name: String,
    /// Hostname or IP address of the IRC server or bouncer.
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub tls: bool,
    pub nickname: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

/// Notification behavior that is not part of the runtime option store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Kill the notification command after this many seconds. Unset means
    /// wait for it however long it takes.
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
    /// Treat highlight words as literal text instead of regex fragments.
    #[serde(default)]
    pub literal_highlights: bool,
}

impl NotifierConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    6697
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
