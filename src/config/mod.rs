pub mod model;
pub mod store;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use model::{AppConfig, LoggingConfig, NetworkConfig};
pub use store::{ConfigStore, FileStore, OptionKey};

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mentioncmd")
}

/// Location of the persisted runtime options (`cmd`, `highlights`, ...).
pub fn options_path() -> PathBuf {
    config_dir().join("options.toml")
}

pub fn load_config() -> Result<AppConfig> {
    let path = config_dir().join("config.toml");
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config file")?;
    Ok(config)
}
