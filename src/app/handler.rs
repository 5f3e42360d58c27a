use crate::app::action::Action;
use crate::app::commands;
use crate::app::event::HostEvent;
use crate::app::state::Notifier;
use crate::config::OptionKey;
use crate::notify::dispatch::{evaluate_message, normalize_action, should_process, MatchDecision};
use tracing::{debug, trace};

/// What the notifier needs to know about the connection it is running in.
pub trait Host {
    /// Whether the user currently has a client viewing `network` live.
    fn is_network_attached(&self, network: &str) -> bool;
}

pub fn handle_event(notifier: &mut Notifier, host: &dyn Host, event: HostEvent) -> Vec<Action> {
    match event {
        HostEvent::MessageReceived {
            network,
            channel,
            sender,
            text,
            is_action,
        } => {
            if should_process(notifier.debug, host.is_network_attached(&network)) {
                let text = if is_action {
                    normalize_action(&sender, &text)
                } else {
                    text
                };
                match channel {
                    Some(channel) => handle_channel_message(notifier, &network, &channel, &sender, &text),
                    None => handle_private_message(notifier, &network, &sender, &text),
                }
            } else {
                trace!(network = %network, "client attached, skipping message");
            }
        }
        HostEvent::ClientDetached { network, nickname } => {
            notifier.identities.on_detach(&network, &nickname);
        }
        HostEvent::AdminCommand(line) => commands::run_admin_command(notifier, &line),
    }

    std::mem::take(&mut notifier.pending_actions)
}

fn handle_channel_message(
    notifier: &mut Notifier,
    network: &str,
    channel: &str,
    nick: &str,
    message: &str,
) {
    let decision = evaluate_message(
        nick,
        Some(channel),
        message,
        notifier.blacklist(),
        notifier.highlights(),
        notifier.identities.lookup(network),
    );

    match decision {
        MatchDecision::Ignored => {
            notifier.put_debug(format!("Ignored msg from '{}' on '{}': {}", nick, channel, message));
        }
        MatchDecision::Matched => {
            notifier.send_notification(network, Some(channel), nick, message);
            notifier.put_debug(format!(
                "Message matched. msg '{}' on '{}' from '{}'",
                message, channel, nick
            ));
        }
        MatchDecision::NoMatch => {}
    }
}

/// Private messages are addressed to the user, so anything not blacklisted
/// triggers a notification and, once delivered, the optional auto-reply.
fn handle_private_message(notifier: &mut Notifier, network: &str, nick: &str, message: &str) {
    if notifier.blacklist().contains(nick) {
        notifier.put_debug(format!("Ignoring private message from {}: {}", nick, message));
        return;
    }

    if notifier.send_notification(network, None, nick, message) {
        let reply = notifier.store().get(OptionKey::PmReply);
        if !reply.is_empty() {
            debug!(network, nick, "sending pm reply");
            notifier.pending_actions.push(Action::SendReply {
                network: network.to_string(),
                target: nick.to_string(),
                text: reply,
            });
        }
    }
    notifier.put_debug(format!("Private message received from {}: {}", nick, message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::notify::dispatch::tests::RecordingLauncher;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakeHost {
        attached: HashSet<String>,
    }

    impl Host for FakeHost {
        fn is_network_attached(&self, network: &str) -> bool {
            self.attached.contains(network)
        }
    }

    fn setup(cmd: &str) -> (Notifier, RecordingLauncher) {
        let launcher = RecordingLauncher::default();
        let mut notifier =
            Notifier::load(ConfigStore::in_memory(), Box::new(launcher.clone()), false).unwrap();
        notifier.store_mut().set("cmd", cmd).unwrap();
        (notifier, launcher)
    }

    fn admin(notifier: &mut Notifier, host: &FakeHost, line: &str) -> Vec<Action> {
        handle_event(notifier, host, HostEvent::AdminCommand(line.to_string()))
    }

    fn chan_msg(network: &str, channel: &str, sender: &str, text: &str) -> HostEvent {
        HostEvent::MessageReceived {
            network: network.into(),
            channel: Some(channel.into()),
            sender: sender.into(),
            text: text.into(),
            is_action: false,
        }
    }

    fn priv_msg(network: &str, sender: &str, text: &str) -> HostEvent {
        HostEvent::MessageReceived {
            network: network.into(),
            channel: None,
            sender: sender.into(),
            text: text.into(),
            is_action: false,
        }
    }

    #[test]
    fn highlight_in_channel_dispatches() {
        let (mut n, launcher) = setup("/bin/notify");
        let host = FakeHost::default();
        admin(&mut n, &host, "set highlights hi");

        let actions = handle_event(&mut n, &host, chan_msg("work", "#general", "alice", "hi"));
        assert!(actions.is_empty());
        assert_eq!(
            launcher.calls.borrow()[..],
            [vec!["/bin/notify", "work", "#general", "alice", "hi"]]
        );
    }

    #[test]
    fn attached_network_is_skipped() {
        let (mut n, launcher) = setup("/bin/notify");
        let host = FakeHost {
            attached: ["work".to_string()].into(),
        };
        admin(&mut n, &host, "set highlights hi");

        handle_event(&mut n, &host, chan_msg("work", "#general", "alice", "hi"));
        handle_event(&mut n, &host, priv_msg("work", "alice", "hi"));
        assert!(launcher.calls.borrow().is_empty());

        handle_event(&mut n, &host, chan_msg("home", "#general", "alice", "hi"));
        assert_eq!(launcher.calls.borrow().len(), 1);
    }

    #[test]
    fn detached_nick_matches_on_its_network() {
        let (mut n, launcher) = setup("/bin/notify");
        let host = FakeHost::default();
        handle_event(
            &mut n,
            &host,
            HostEvent::ClientDetached {
                network: "net1".into(),
                nickname: "Bob".into(),
            },
        );

        handle_event(&mut n, &host, chan_msg("net1", "#c", "alice", "hey BOB!"));
        handle_event(&mut n, &host, chan_msg("net2", "#c", "alice", "hey BOB!"));
        handle_event(&mut n, &host, chan_msg("net1", "#c", "alice", "bobcat sighting"));

        let calls = launcher.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][1], "net1");
    }

    #[test]
    fn blacklisted_sender_never_notifies() {
        let (mut n, launcher) = setup("/bin/notify");
        let host = FakeHost::default();
        admin(&mut n, &host, "set highlights deploy");
        admin(&mut n, &host, "set nick_blacklist ci-bot");

        handle_event(&mut n, &host, chan_msg("work", "#ops", "ci-bot", "deploy done"));
        let actions = handle_event(&mut n, &host, priv_msg("work", "ci-bot", "deploy done"));
        assert!(actions.is_empty());
        assert!(launcher.calls.borrow().is_empty());
    }

    #[test]
    fn action_is_prefixed_with_nick() {
        let (mut n, launcher) = setup("/bin/notify");
        let host = FakeHost::default();
        admin(&mut n, &host, "set highlights cake");

        handle_event(
            &mut n,
            &host,
            HostEvent::MessageReceived {
                network: "work".into(),
                channel: Some("#kitchen".into()),
                sender: "alice".into(),
                text: "eats the cake".into(),
                is_action: true,
            },
        );
        assert_eq!(launcher.calls.borrow()[0][4], "* alice eats the cake");
    }

    #[test]
    fn private_message_notifies_and_replies() {
        let (mut n, launcher) = setup("/bin/notify");
        let host = FakeHost::default();

        let actions = handle_event(&mut n, &host, priv_msg("work", "alice", "you there?"));
        assert_eq!(
            launcher.calls.borrow()[0],
            ["/bin/notify", "work", "[PM]", "alice", "you there?"]
        );
        assert_eq!(
            actions,
            [Action::SendReply {
                network: "work".into(),
                target: "alice".into(),
                text: OptionKey::PmReply.default_value().into(),
            }]
        );
    }

    #[test]
    fn no_reply_when_disabled_or_not_sent() {
        let (mut n, _) = setup("/bin/notify");
        let host = FakeHost::default();
        admin(&mut n, &host, "unset pm_reply");
        let actions = handle_event(&mut n, &host, priv_msg("work", "alice", "ping"));
        assert!(actions.is_empty());

        let (mut n, _) = setup("");
        let actions = handle_event(&mut n, &host, priv_msg("work", "alice", "ping"));
        assert_eq!(
            actions,
            [Action::Report("Error: command to run not specified".into())]
        );
    }

    #[test]
    fn debug_mode_does_not_leak_after_test() {
        let (mut n, launcher) = setup("");
        let host = FakeHost {
            attached: ["work".to_string()].into(),
        };
        admin(&mut n, &host, "set highlights hello");
        let actions = admin(&mut n, &host, "test hello world");
        assert!(actions.contains(&Action::Report("Error: command to run not specified".into())));

        n.store_mut().set("cmd", "/bin/notify").unwrap();
        let actions = handle_event(&mut n, &host, chan_msg("work", "#c", "alice", "hello"));
        assert!(actions.is_empty());
        assert!(launcher.calls.borrow().is_empty());
    }
}
