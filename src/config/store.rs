//! Runtime option store.
//!
//! The four notifier options live in a flat string map that survives
//! restarts. [`ConfigStore`] is the only way in or out: it knows the schema,
//! falls back to defaults and refuses unknown names.

use crate::notify::NotifyError;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

/// A recognized option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Cmd,
    NickBlacklist,
    Highlights,
    PmReply,
}

impl OptionKey {
    /// All options in display order.
    pub fn all() -> &'static [OptionKey] {
        &[
            Self::Cmd,
            Self::NickBlacklist,
            Self::Highlights,
            Self::PmReply,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cmd => "cmd",
            Self::NickBlacklist => "nick_blacklist",
            Self::Highlights => "highlights",
            Self::PmReply => "pm_reply",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Cmd => "The command to execute. The network name, channel name, nick and message will be passed as params (in that order)",
            Self::NickBlacklist => "Nicks to ignore when they mention/PM you",
            Self::Highlights => "Extra words/names to be notified about",
            Self::PmReply => "If set, this message will be sent as a reply to users who PM you",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            Self::Cmd | Self::NickBlacklist | Self::Highlights => "",
            Self::PmReply => "[znc] User is not currently connected but has been notified.",
        }
    }

    pub fn from_name(name: &str) -> Option<OptionKey> {
        Self::all().iter().copied().find(|key| key.name() == name)
    }
}

/// Persistent string key-value backend.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Backend that forgets everything on exit.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend persisted as a flat TOML table, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let values: BTreeMap<String, String> = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read options from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse options file {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), count = values.len(), "opened option store");
        Ok(Self { path, values })
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self.values).map_err(io::Error::other)?;
        std::fs::write(&self.path, contents)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// Typed view over a [`KvStore`] restricted to the known options.
pub struct ConfigStore {
    backend: Box<dyn KvStore>,
}

impl ConfigStore {
    pub fn new(backend: Box<dyn KvStore>) -> Self {
        Self { backend }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    /// Write the default for every option that has never been set.
    pub fn fill_defaults(&mut self) -> Result<(), NotifyError> {
        for key in OptionKey::all() {
            if self.backend.get(key.name()).is_none() {
                self.backend.set(key.name(), key.default_value())?;
            }
        }
        Ok(())
    }

    pub fn get(&self, key: OptionKey) -> String {
        self.backend
            .get(key.name())
            .unwrap_or_else(|| key.default_value().to_string())
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<OptionKey, NotifyError> {
        let key = OptionKey::from_name(name)
            .ok_or_else(|| NotifyError::UnknownOption(name.to_string()))?;
        self.backend.set(key.name(), value)?;
        info!(option = key.name(), value, "option updated");
        Ok(key)
    }

    pub fn reset(&mut self, name: &str) -> Result<OptionKey, NotifyError> {
        let key = OptionKey::from_name(name)
            .ok_or_else(|| NotifyError::UnknownOption(name.to_string()))?;
        self.set(name, key.default_value())
    }

    /// `(option, current value, default)` for every option, in display order.
    pub fn all(&self) -> Vec<(OptionKey, String, &'static str)> {
        OptionKey::all()
            .iter()
            .map(|key| (*key, self.get(*key), key.default_value()))
            .collect()
    }
}
