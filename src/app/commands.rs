//! Admin command parser and executor.
//!
//! Parses console lines such as `set highlights deploy outage` into typed
//! [`AdminCommand`] values and applies them to the [`Notifier`].

use crate::app::state::Notifier;
use crate::app::table;
use crate::config::OptionKey;
use crate::notify::NotifyError;
use tracing::info;

/// Channel and nick used by `test` notifications.
pub const TEST_CHANNEL: &str = "#testing";
pub const TEST_NICK: &str = "test_cmd";

const COMMANDS: &[(&str, &str)] = &[
    ("help", "Shows the help text"),
    ("show", "Lists the module's configurable options"),
    ("set", "Set a config option ('set <option> <value>')"),
    ("unset", "Set a config option to '' ('unset <option>')"),
    ("default", "Set a config option back to its default ('default <option>')"),
    ("test", "Send a message for testing purposes ('test <msg>')"),
    ("about", "Show information on this module"),
];

/// A parsed admin command. Each variant corresponds to a console keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Help,
    Show,
    Set { option: String, value: String },
    Unset { option: String },
    Default { option: String },
    Test { message: String },
    About,
    Invalid,
}

impl AdminCommand {
    /// Whether executing this command writes to the option store.
    pub fn mutates_config(&self) -> bool {
        matches!(
            self,
            Self::Set { .. } | Self::Unset { .. } | Self::Default { .. }
        )
    }
}

/// Parse one console line. Argument-count problems come back as
/// [`NotifyError::Usage`]; unrecognized keywords as [`AdminCommand::Invalid`].
pub fn parse_admin_command(line: &str) -> Result<AdminCommand, NotifyError> {
    let mut words = line.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let cmd = match keyword {
        "help" => AdminCommand::Help,
        "show" => AdminCommand::Show,
        "set" => match args.split_first() {
            Some((option, value)) if !value.is_empty() => AdminCommand::Set {
                option: option.to_string(),
                value: value.join(" "),
            },
            _ => return Err(NotifyError::Usage("set <option> <value>")),
        },
        "unset" => match args[..] {
            [option] => AdminCommand::Unset {
                option: option.to_string(),
            },
            _ => return Err(NotifyError::Usage("unset <option>")),
        },
        "default" => match args[..] {
            [option] => AdminCommand::Default {
                option: option.to_string(),
            },
            _ => return Err(NotifyError::Usage("default <option>")),
        },
        "test" => {
            if args.is_empty() {
                return Err(NotifyError::Usage("test <msg>"));
            }
            AdminCommand::Test {
                message: args.join(" "),
            }
        }
        "about" => AdminCommand::About,
        _ => AdminCommand::Invalid,
    };
    Ok(cmd)
}

/// Parse and run one console line, reporting the outcome to the operator.
pub fn run_admin_command(notifier: &mut Notifier, line: &str) {
    notifier.put_debug(format!("You said '{}'", line));

    let cmd = match parse_admin_command(line) {
        Ok(cmd) => cmd,
        Err(e) => {
            notifier.report(e.operator_message());
            // Usage errors for set/unset/default still count as config commands.
            if matches!(line.split_whitespace().next(), Some("set" | "unset" | "default")) {
                notifier.reload_config();
            }
            return;
        }
    };

    let mutates = cmd.mutates_config();
    match cmd {
        AdminCommand::Help => show_help(notifier),
        AdminCommand::Show => show_options(notifier),
        AdminCommand::Set { option, value } => set_option(notifier, &option, &value),
        AdminCommand::Unset { option } => set_option(notifier, &option, ""),
        AdminCommand::Default { option } => match notifier.store_mut().reset(&option) {
            Ok(key) => {
                info!(option = key.name(), "reset from admin console");
                notifier.report(format!("Set '{}' to '{}'", key.name(), key.default_value()));
            }
            Err(e) => notifier.report(e.operator_message()),
        },
        AdminCommand::Test { message } => {
            let previous = std::mem::replace(&mut notifier.debug, true);
            notifier.send_notification("", Some(TEST_CHANNEL), TEST_NICK, &message);
            notifier.debug = previous;
        }
        AdminCommand::About => {
            notifier.report(format!("MentionCMD {}", env!("CARGO_PKG_VERSION")));
            notifier.report("Runs a command when you are mentioned or PM'd on IRC");
            notifier.report("Feel free to submit pull requests and bug reports!");
        }
        AdminCommand::Invalid => notifier.report("Error: Invalid command, try 'help'"),
    }

    if mutates {
        notifier.reload_config();
    }
}

fn set_option(notifier: &mut Notifier, option: &str, value: &str) {
    match notifier.store_mut().set(option, value) {
        Ok(key) => {
            info!(option = key.name(), "set from admin console");
            notifier.report(format!("Set '{}' to '{}'", key.name(), value));
        }
        Err(e) => notifier.report(e.operator_message()),
    }
}

fn show_help(notifier: &mut Notifier) {
    notifier.report("Commands:");
    let rows: Vec<Vec<String>> = COMMANDS
        .iter()
        .map(|(name, desc)| vec![name.to_string(), desc.to_string()])
        .collect();
    for line in table::render(&["Command", "Description"], &rows) {
        notifier.report(line);
    }

    notifier.report("Options:");
    let rows: Vec<Vec<String>> = OptionKey::all()
        .iter()
        .map(|key| vec![key.name().to_string(), key.description().to_string()])
        .collect();
    for line in table::render(&["Option", "Description"], &rows) {
        notifier.report(line);
    }
}

fn show_options(notifier: &mut Notifier) {
    let rows: Vec<Vec<String>> = notifier
        .store()
        .all()
        .into_iter()
        .map(|(key, value, default)| {
            let shown = if value == default {
                "[default]".to_string()
            } else {
                format!("'{}'", value)
            };
            vec![key.name().to_string(), shown, format!("'{}'", default)]
        })
        .collect();
    for line in table::render(&["Option", "Value", "Default"], &rows) {
        notifier.report(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::action::Action;
    use crate::config::ConfigStore;
    use crate::notify::dispatch::tests::RecordingLauncher;

    fn notifier() -> (Notifier, RecordingLauncher) {
        let launcher = RecordingLauncher::default();
        let notifier =
            Notifier::load(ConfigStore::in_memory(), Box::new(launcher.clone()), false).unwrap();
        (notifier, launcher)
    }

    fn reports(notifier: &mut Notifier) -> Vec<String> {
        notifier
            .pending_actions
            .drain(..)
            .filter_map(|a| match a {
                Action::Report(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn parse_set_joins_value() {
        assert_eq!(
            parse_admin_command("set highlights  alpha   beta").unwrap(),
            AdminCommand::Set {
                option: "highlights".into(),
                value: "alpha beta".into()
            }
        );
    }

    #[test]
    fn parse_usage_errors() {
        for (line, usage) in [
            ("set", "set <option> <value>"),
            ("set cmd", "set <option> <value>"),
            ("unset", "unset <option>"),
            ("unset cmd extra", "unset <option>"),
            ("default", "default <option>"),
            ("test", "test <msg>"),
        ] {
            match parse_admin_command(line) {
                Err(NotifyError::Usage(u)) => assert_eq!(u, usage, "line {:?}", line),
                other => panic!("{:?} parsed as {:?}", line, other),
            }
        }
    }

    #[test]
    fn parse_unknown_keyword() {
        assert_eq!(parse_admin_command("frobnicate").unwrap(), AdminCommand::Invalid);
        assert_eq!(parse_admin_command("").unwrap(), AdminCommand::Invalid);
        assert_eq!(parse_admin_command("HELP").unwrap(), AdminCommand::Invalid);
    }

    #[test]
    fn set_show_unset_default_round_trip() {
        let (mut n, _) = notifier();

        run_admin_command(&mut n, "set highlights alpha beta");
        assert_eq!(reports(&mut n), ["Set 'highlights' to 'alpha beta'"]);
        assert_eq!(n.highlights().len(), 2);

        run_admin_command(&mut n, "show");
        let shown = reports(&mut n);
        assert!(shown.iter().any(|l| l.contains("| highlights") && l.contains("'alpha beta'")));
        assert!(shown.iter().any(|l| l.contains("| cmd") && l.contains("[default]")));

        run_admin_command(&mut n, "unset highlights");
        assert_eq!(n.store().get(OptionKey::Highlights), "");
        assert!(n.highlights().is_empty());

        run_admin_command(&mut n, "set highlights gamma");
        run_admin_command(&mut n, "default highlights");
        assert_eq!(n.store().get(OptionKey::Highlights), "");
        assert!(n.highlights().is_empty());
    }

    #[test]
    fn unset_pm_reply_differs_from_default() {
        let (mut n, _) = notifier();
        run_admin_command(&mut n, "unset pm_reply");
        assert_eq!(n.store().get(OptionKey::PmReply), "");
        reports(&mut n);

        run_admin_command(&mut n, "show");
        assert!(reports(&mut n)
            .iter()
            .any(|l| l.starts_with("| pm_reply") && l.contains("| ''")));

        run_admin_command(&mut n, "default pm_reply");
        assert_eq!(
            n.store().get(OptionKey::PmReply),
            OptionKey::PmReply.default_value()
        );
        assert_eq!(
            reports(&mut n),
            ["Set 'pm_reply' to '[znc] User is not currently connected but has been notified.'"]
        );
    }

    #[test]
    fn invalid_option_name() {
        let (mut n, _) = notifier();
        run_admin_command(&mut n, "set colour red");
        run_admin_command(&mut n, "default colour");
        let out = reports(&mut n);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|l| l.starts_with("Error: invalid option name")));
    }

    #[test]
    fn blacklist_rebuilt_after_set() {
        let (mut n, _) = notifier();
        run_admin_command(&mut n, "set nick_blacklist bot1 bot2");
        assert!(n.blacklist().contains("bot1"));
        assert!(n.blacklist().contains("bot2"));
    }

    #[test]
    fn test_without_command_restores_debug() {
        let (mut n, launcher) = notifier();
        run_admin_command(&mut n, "test hello world");
        assert!(!n.debug);
        assert!(launcher.calls.borrow().is_empty());
        assert!(reports(&mut n).contains(&"Error: command to run not specified".to_string()));
    }

    #[test]
    fn test_sends_placeholder_notification() {
        let (mut n, launcher) = notifier();
        run_admin_command(&mut n, "set cmd /bin/notify");
        reports(&mut n);

        run_admin_command(&mut n, "test hello   world");
        assert_eq!(
            launcher.calls.borrow()[0],
            ["/bin/notify", "[No network]", "#testing", "test_cmd", "hello world"]
        );
        // Debug output is on for the duration of the test command.
        assert_eq!(
            reports(&mut n),
            ["Calling '/bin/notify' with args '[No network]', '#testing', 'test_cmd', 'hello world'"]
        );
        assert!(!n.debug);
    }

    #[test]
    fn test_usage() {
        let (mut n, _) = notifier();
        run_admin_command(&mut n, "test");
        assert_eq!(reports(&mut n), ["Usage: test <msg>"]);
    }

    #[test]
    fn help_lists_commands_and_options() {
        let (mut n, _) = notifier();
        run_admin_command(&mut n, "help");
        let out = reports(&mut n);
        assert_eq!(out[0], "Commands:");
        assert!(out.contains(&"Options:".to_string()));
        for name in ["help", "show", "set", "unset", "default", "test", "about"] {
            assert!(out.iter().any(|l| l.starts_with(&format!("| {} ", name))));
        }
        for key in OptionKey::all() {
            assert!(out.iter().any(|l| l.starts_with(&format!("| {} ", key.name()))));
        }
    }

    #[test]
    fn unknown_command() {
        let (mut n, _) = notifier();
        run_admin_command(&mut n, "reload");
        assert_eq!(reports(&mut n), ["Error: Invalid command, try 'help'"]);
    }
}
