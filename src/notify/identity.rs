use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::highlight::compile_word;

/// Remembers, per network, the nickname the user had when their client last
/// detached. Entries are replaced on the next detach and never expire.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    nicks: HashMap<String, Regex>,
}

impl IdentityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `nickname` as the user's identity on `network`. Nicknames are
    /// matched literally since IRC allows `[]\^{}|` in them.
    pub fn on_detach(&mut self, network: &str, nickname: &str) {
        if nickname.is_empty() {
            warn!(network, "detach without a nickname, keeping previous identity");
            return;
        }
        match compile_word(nickname, true) {
            Ok(re) => {
                debug!(network, nickname, "tracking nickname");
                self.nicks.insert(network.to_string(), re);
            }
            Err(e) => warn!(network, nickname, error = %e, "cannot match nickname"),
        }
    }

    pub fn lookup(&self, network: &str) -> Option<&Regex> {
        self.nicks.get(network)
    }
}
