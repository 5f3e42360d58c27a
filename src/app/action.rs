use crate::app::event::NetworkId;

/// Outbound requests produced while handling a [`HostEvent`](super::event::HostEvent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send `text` to `target` on `network` (PM auto-replies).
    SendReply { network: NetworkId, target: String, text: String },
    /// Show a line to the operator.
    Report(String),
}
