use crate::app::action::Action;
use crate::config::{ConfigStore, OptionKey};
use crate::notify::dispatch::{self, Launcher, Notification};
use crate::notify::highlight::Highlights;
use crate::notify::identity::IdentityTracker;
use crate::notify::NotifyError;
use std::collections::HashSet;
use tracing::{debug, warn};

/// All notifier state. Created once at startup and handed by `&mut` to every
/// event handler; derived fields are rebuilt by [`Notifier::reload_config`].
pub struct Notifier {
    store: ConfigStore,
    highlights: Highlights,
    blacklist: HashSet<String>,
    pub identities: IdentityTracker,
    /// Bypasses the attachment gate and echoes diagnostics to the operator.
    pub debug: bool,
    literal_highlights: bool,
    launcher: Box<dyn Launcher>,
    pub pending_actions: Vec<Action>,
}

impl Notifier {
    /// Fill in missing options and compile the matchers.
    pub fn load(
        mut store: ConfigStore,
        launcher: Box<dyn Launcher>,
        literal_highlights: bool,
    ) -> Result<Self, NotifyError> {
        store.fill_defaults()?;
        let mut notifier = Self {
            store,
            highlights: Highlights::default(),
            blacklist: HashSet::new(),
            identities: IdentityTracker::new(),
            debug: false,
            literal_highlights,
            launcher,
            pending_actions: Vec::new(),
        };
        notifier.reload_config();
        Ok(notifier)
    }

    /// Recompile highlights and rebuild the blacklist from the stored options.
    pub fn reload_config(&mut self) {
        self.highlights =
            Highlights::compile(&self.store.get(OptionKey::Highlights), self.literal_highlights);
        self.blacklist = self
            .store
            .get(OptionKey::NickBlacklist)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        debug!(
            highlights = self.highlights.len(),
            blacklisted = self.blacklist.len(),
            "reloaded config"
        );
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn blacklist(&self) -> &HashSet<String> {
        &self.blacklist
    }

    pub fn report(&mut self, text: impl Into<String>) {
        self.pending_actions.push(Action::Report(text.into()));
    }

    /// Report only while debugging.
    pub fn put_debug(&mut self, text: impl Into<String>) {
        if self.debug {
            self.report(text);
        }
    }

    /// Run the notification command. Failures go to the operator; the return
    /// value says whether the command actually ran.
    pub fn send_notification(
        &mut self,
        network: &str,
        channel: Option<&str>,
        nick: &str,
        message: &str,
    ) -> bool {
        let cmd = self.store.get(OptionKey::Cmd);
        let notification = Notification {
            network,
            channel,
            nick,
            message,
        };
        if !cmd.is_empty() {
            let [network, channel, nick, message] = notification.args();
            self.put_debug(format!(
                "Calling '{}' with args '{}', '{}', '{}', '{}'",
                cmd, network, channel, nick, message
            ));
        }

        match dispatch::dispatch(self.launcher.as_ref(), &cmd, &notification) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "notification failed");
                self.report(e.operator_message());
                false
            }
        }
    }
}
