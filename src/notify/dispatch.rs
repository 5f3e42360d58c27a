//! Notification gating and external command invocation.

use regex::Regex;
use std::collections::HashSet;
use std::io;
use std::process::Command;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::highlight::{match_any, Highlights};
use super::NotifyError;

/// Passed in place of an empty network name.
pub const NO_NETWORK: &str = "[No network]";
/// Passed in place of the channel for private messages.
pub const PRIVATE_CHANNEL: &str = "[PM]";

const TIMEOUT_POLL: Duration = Duration::from_millis(50);

/// Whether a message should be looked at at all. While a client is attached
/// the user sees messages live, so notifying would only duplicate them.
pub fn should_process(debug: bool, attached: bool) -> bool {
    debug || !attached
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// Sender is blacklisted.
    Ignored,
    Matched,
    NoMatch,
}

pub fn evaluate_message(
    nick: &str,
    channel: Option<&str>,
    message: &str,
    blacklist: &HashSet<String>,
    highlights: &Highlights,
    identity: Option<&Regex>,
) -> MatchDecision {
    let decision = if blacklist.contains(nick) {
        MatchDecision::Ignored
    } else if match_any(message, highlights, identity) {
        MatchDecision::Matched
    } else {
        MatchDecision::NoMatch
    };
    debug!(nick, channel = channel.unwrap_or(PRIVATE_CHANNEL), ?decision, "evaluated message");
    decision
}

/// Rewrite a CTCP ACTION (`/me waves`) the way it reads on screen.
pub fn normalize_action(nick: &str, text: &str) -> String {
    format!("* {} {}", nick, text)
}

/// The context handed to the notification command.
#[derive(Debug, Clone, Copy)]
pub struct Notification<'a> {
    pub network: &'a str,
    pub channel: Option<&'a str>,
    pub nick: &'a str,
    pub message: &'a str,
}

impl<'a> Notification<'a> {
    /// Positional arguments: network, channel, nick, message.
    pub fn args(&self) -> [&'a str; 4] {
        let network = if self.network.is_empty() {
            NO_NETWORK
        } else {
            self.network
        };
        [
            network,
            self.channel.unwrap_or(PRIVATE_CHANNEL),
            self.nick,
            self.message,
        ]
    }
}

/// How a launched command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Code(i32),
    /// Killed by a signal or by the timeout.
    Terminated,
}

/// Starts the notification command and waits for it.
pub trait Launcher {
    fn launch(&self, program: &str, args: &[&str]) -> io::Result<ExitKind>;
}

/// Runs the command as a child process, blocking until it exits.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    timeout: Option<Duration>,
}

impl ProcessLauncher {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, program: &str, args: &[&str]) -> io::Result<ExitKind> {
        let mut child = Command::new(program).args(args).spawn()?;

        let status = match self.timeout {
            None => child.wait()?,
            Some(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    if let Some(status) = child.try_wait()? {
                        break status;
                    }
                    if Instant::now() >= deadline {
                        warn!(program, ?limit, "notification command timed out, killing it");
                        child.kill()?;
                        child.wait()?;
                        return Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            format!("timed out after {:?}", limit),
                        ));
                    }
                    std::thread::sleep(TIMEOUT_POLL);
                }
            }
        };

        Ok(status.code().map_or(ExitKind::Terminated, ExitKind::Code))
    }
}

/// Invoke `cmd` for `notification`.
///
/// A non-zero exit code still counts as a delivered notification; only a
/// command that cannot be started or dies abnormally is an error.
pub fn dispatch(
    launcher: &dyn Launcher,
    cmd: &str,
    notification: &Notification<'_>,
) -> Result<(), NotifyError> {
    if cmd.is_empty() {
        return Err(NotifyError::NoCommandConfigured);
    }

    let args = notification.args();
    let invocation_error = |source: io::Error| NotifyError::Invocation {
        cmd: cmd.to_string(),
        source,
    };

    match launcher.launch(cmd, &args).map_err(invocation_error)? {
        ExitKind::Code(0) => {
            info!(cmd, network = args[0], channel = args[1], nick = args[2], "notification sent");
            Ok(())
        }
        ExitKind::Code(code) => {
            warn!(cmd, code, "notification command exited with non-zero status");
            Ok(())
        }
        ExitKind::Terminated => Err(invocation_error(io::Error::other(
            "terminated by signal",
        ))),
    }
}
