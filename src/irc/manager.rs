use crate::app::event::{AppEvent, HostEvent, NetworkId};
use crate::app::handler::Host;
use crate::config::NetworkConfig;
use crate::irc::connection::{spawn_connection, IrcConnection};
use crate::irc::events::{observe, NetworkState, Observed};
use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub struct IrcManager {
    connections: HashMap<NetworkId, IrcConnection>,
    networks: HashMap<NetworkId, NetworkState>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl IrcManager {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            connections: HashMap::new(),
            networks: HashMap::new(),
            event_tx,
        }
    }

    pub async fn connect(&mut self, cfg: &NetworkConfig) -> Result<()> {
        let conn = spawn_connection(cfg, self.event_tx.clone()).await?;
        info!(network = %cfg.name, host = %cfg.host, port = cfg.port, "connected");
        self.networks
            .insert(cfg.name.clone(), NetworkState::new(cfg.nickname.clone()));
        self.connections.insert(cfg.name.clone(), conn);
        Ok(())
    }

    /// Forget a connection whose stream ended. The network state is kept so
    /// the last known nickname survives until the next welcome.
    pub fn remove(&mut self, network: &str) {
        if let Some(conn) = self.connections.remove(network) {
            info!(network = %conn.network, "connection removed");
        }
    }

    pub fn get_sender(&self, network: &str) -> Option<&irc::client::Sender> {
        self.connections.get(network).map(|c| &c.sender)
    }

    pub fn send_privmsg(&self, network: &str, target: &str, text: &str) -> Result<()> {
        if let Some(sender) = self.get_sender(network) {
            // No CTCP injection in outbound messages
            let clean = text.replace('\x01', "");
            sender.send_privmsg(target, &clean)?;
        }
        Ok(())
    }

    pub fn send_whois(&self, network: &str, nick: &str) -> Result<()> {
        if let Some(sender) = self.get_sender(network) {
            sender.send(irc::client::prelude::Command::WHOIS(
                None,
                nick.to_string(),
            ))?;
        }
        Ok(())
    }

    pub fn send_quit_all(&self, message: &str) {
        for conn in self.connections.values() {
            let _ = conn.sender.send_quit(message);
        }
    }

    /// Track nick/away state for `network` and turn `message` into a notifier
    /// event where one applies.
    pub fn handle_message(
        &mut self,
        network: &str,
        message: &irc::client::prelude::Message,
    ) -> Option<HostEvent> {
        let state = self.networks.get_mut(network)?;
        match observe(network, state, message)? {
            Observed::Host(event) => Some(event),
            Observed::WhoisSelf(nick) => {
                if let Err(e) = self.send_whois(network, &nick) {
                    warn!(network, error = %e, "away check failed");
                }
                None
            }
        }
    }
}

impl Host for IrcManager {
    fn is_network_attached(&self, network: &str) -> bool {
        self.networks.get(network).is_some_and(|state| !state.away)
    }
}
