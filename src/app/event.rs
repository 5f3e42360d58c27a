/// Networks are identified by their configured name.
pub type NetworkId = String;

/// Events the notifier core reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A channel message (`channel` set) or private message (`channel` unset).
    MessageReceived {
        network: NetworkId,
        channel: Option<String>,
        sender: String,
        text: String,
        is_action: bool,
    },

    /// The user's client went away from `network` while using `nickname`.
    ClientDetached {
        network: NetworkId,
        nickname: String,
    },

    /// A line typed at the admin console.
    AdminCommand(String),
}

/// Everything the daemon's main loop waits on.
#[derive(Debug)]
pub enum AppEvent {
    /// IRC message received from a network
    IrcMessage {
        network: NetworkId,
        message: irc::client::prelude::Message,
    },

    /// IRC connection state changed
    IrcConnected {
        network: NetworkId,
    },
    IrcDisconnected {
        network: NetworkId,
        reason: String,
    },
    IrcError {
        network: NetworkId,
        error: String,
    },

    /// Admin console input
    AdminLine(String),
    AdminClosed,
}
