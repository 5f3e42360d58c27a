//! Translates raw IRC traffic into notifier events.
//!
//! A network counts as attached while the user is not marked away on it.
//! Bouncers such as ZNC (with `simple_away`) mark the user away when their
//! last client disconnects, which the server confirms with `RPL_NOWAWAY`.

use crate::app::event::HostEvent;
use irc::client::prelude::{ChannelExt, Command, Message, Response};
use tracing::{debug, info};

/// Membership prefixes a server may put in front of a channel target
/// (STATUSMSG), e.g. `@#ops` for a message to the channel's operators.
const STATUSMSG_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

/// ZNC module pseudo-users (`*status`, `*controlpanel`) start with this.
const MODULE_PREFIX: char = '*';

/// What the connection knows about the user on one network.
#[derive(Debug, Clone)]
pub struct NetworkState {
    pub nickname: String,
    pub away: bool,
}

impl NetworkState {
    pub fn new(nickname: String) -> Self {
        Self {
            nickname,
            away: false,
        }
    }

    fn is_self(&self, nick: &str) -> bool {
        self.nickname.eq_ignore_ascii_case(nick)
    }

    fn mark_away(&mut self, network: &str) -> Option<Observed> {
        if self.away {
            return None;
        }
        self.away = true;
        info!(network, nickname = %self.nickname, "user detached");
        Some(Observed::Host(HostEvent::ClientDetached {
            network: network.to_string(),
            nickname: self.nickname.clone(),
        }))
    }
}

/// Result of looking at one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Host(HostEvent),
    /// Registration finished; ask the server whether we are already away.
    WhoisSelf(String),
}

/// The channel a PRIVMSG target addresses, or `None` for a private message.
/// A STATUSMSG prefix is stripped so `@#ops` reports as `#ops`.
fn channel_of(target: &str) -> Option<&str> {
    let bare = target.trim_start_matches(STATUSMSG_PREFIXES);
    if bare != target && bare.is_channel_name() {
        Some(bare)
    } else if target.is_channel_name() {
        Some(target)
    } else {
        None
    }
}

/// Update `state` from `message` and return the resulting event, if any.
pub fn observe(network: &str, state: &mut NetworkState, message: &Message) -> Option<Observed> {
    match &message.command {
        Command::PRIVMSG(target, text) => {
            // Server-prefixed messages carry no nickname and are dropped here.
            let sender = message.source_nickname()?;
            if state.is_self(sender) {
                return None;
            }
            if sender.starts_with(MODULE_PREFIX) {
                debug!(network, sender, "ignoring bouncer module message");
                return None;
            }
            let (text, is_action) = match text.strip_prefix('\x01') {
                Some(ctcp) => {
                    let ctcp = ctcp.strip_suffix('\x01').unwrap_or(ctcp);
                    // Other CTCP requests are answered by the irc crate itself.
                    (ctcp.strip_prefix("ACTION ")?.to_string(), true)
                }
                None => (text.clone(), false),
            };
            let channel = channel_of(target).map(str::to_string);
            Some(Observed::Host(HostEvent::MessageReceived {
                network: network.to_string(),
                channel,
                sender: sender.to_string(),
                text,
                is_action,
            }))
        }
        Command::NICK(new_nick) => {
            if message.source_nickname().is_some_and(|n| state.is_self(n)) {
                debug!(network, old = %state.nickname, new = %new_nick, "own nick changed");
                state.nickname = new_nick.clone();
            }
            None
        }
        Command::Response(Response::RPL_WELCOME, args) => {
            if let Some(nick) = args.first() {
                state.nickname = nick.clone();
            }
            Some(Observed::WhoisSelf(state.nickname.clone()))
        }
        Command::Response(Response::RPL_NOWAWAY, _) => state.mark_away(network),
        Command::Response(Response::RPL_UNAWAY, _) => {
            if state.away {
                info!(network, "user attached");
            }
            state.away = false;
            None
        }
        Command::Response(Response::RPL_AWAY, args) => match args.get(1) {
            Some(nick) if state.is_self(nick) => state.mark_away(network),
            _ => None,
        },
        _ => None,
    }
}
