mod app;
mod config;
mod irc;
mod notify;

use crate::app::action::Action;
use crate::app::event::{AppEvent, HostEvent};
use crate::app::handler;
use crate::app::state::Notifier;
use crate::config::{ConfigStore, FileStore, LoggingConfig};
use crate::irc::manager::IrcManager;
use crate::notify::dispatch::ProcessLauncher;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load_config()?;
    init_tracing(&cfg.logging);

    let store = ConfigStore::new(Box::new(FileStore::open(config::options_path())?));
    let launcher = ProcessLauncher::new(cfg.notifier.command_timeout());
    let notifier = Notifier::load(store, Box::new(launcher), cfg.notifier.literal_highlights)?;

    run(cfg, notifier).await
}

fn init_tracing(cfg: &LoggingConfig) {
    let level = cfg.level.parse().unwrap_or(tracing::Level::INFO);
    // stdout belongs to the admin console.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cfg: config::AppConfig, mut notifier: Notifier) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut irc_manager = IrcManager::new(event_tx.clone());

    // Spawn admin console task
    let admin_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if admin_tx.send(AppEvent::AdminLine(line)).is_err() {
                return;
            }
        }
        let _ = admin_tx.send(AppEvent::AdminClosed);
    });

    if cfg.networks.is_empty() {
        warn!("no networks configured, only the admin console is available");
    }
    for net in &cfg.networks {
        if let Err(e) = irc_manager.connect(net).await {
            error!(network = %net.name, error = %e, "connection failed");
            println!("Connection to {} failed: {:#}", net.name, e);
        }
    }

    loop {
        let event = tokio::select! {
            event = event_rx.recv() => event,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(event) = event else { break };

        let host_event = match event {
            AppEvent::IrcMessage { network, message } => {
                irc_manager.handle_message(&network, &message)
            }
            AppEvent::IrcConnected { network } => {
                info!(network = %network, "registering");
                None
            }
            AppEvent::IrcDisconnected { network, reason } => {
                warn!(network = %network, reason = %reason, "disconnected");
                irc_manager.remove(&network);
                None
            }
            AppEvent::IrcError { network, error } => {
                error!(network = %network, error = %error, "connection error");
                None
            }
            AppEvent::AdminLine(line) => Some(HostEvent::AdminCommand(line)),
            AppEvent::AdminClosed => {
                info!("admin console closed");
                None
            }
        };
        let Some(host_event) = host_event else { continue };

        // The notification command runs synchronously; keep the runtime's
        // other tasks (connection readers) moving while it blocks.
        let actions = tokio::task::block_in_place(|| {
            handler::handle_event(&mut notifier, &irc_manager, host_event)
        });

        for action in actions {
            match action {
                Action::SendReply {
                    network,
                    target,
                    text,
                } => {
                    if let Err(e) = irc_manager.send_privmsg(&network, &target, &text) {
                        warn!(network = %network, target = %target, error = %e, "pm reply failed");
                        println!("Reply to {} on {} failed: {}", target, network, e);
                    }
                }
                Action::Report(text) => println!("{}", text),
            }
        }
    }

    irc_manager.send_quit_all("Leaving");
    Ok(())
}
