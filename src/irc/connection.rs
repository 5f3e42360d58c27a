use crate::app::event::{AppEvent, NetworkId};
use crate::config::NetworkConfig;
use anyhow::{Context, Result};
use futures::StreamExt;
use irc::client::prelude::*;
use tokio::sync::mpsc;

pub struct IrcConnection {
    pub network: NetworkId,
    pub sender: irc::client::Sender,
}

pub async fn spawn_connection(
    cfg: &NetworkConfig,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> Result<IrcConnection> {
    let config = Config {
        server: Some(cfg.host.clone()),
        port: Some(cfg.port),
        use_tls: Some(cfg.tls),
        nickname: Some(cfg.nickname.clone()),
        username: cfg.username.clone(),
        realname: cfg.realname.clone(),
        password: cfg.password.clone(),
        channels: cfg.channels.clone(),
        dangerously_accept_invalid_certs: Some(cfg.accept_invalid_certs),
        ..Config::default()
    };

    let mut client = Client::from_config(config)
        .await
        .with_context(|| format!("Failed to connect to {}:{}", cfg.host, cfg.port))?;
    client.identify()?;

    let sender = client.sender();
    let mut stream = client.stream()?;

    let network = cfg.name.clone();
    let _ = event_tx.send(AppEvent::IrcConnected {
        network: network.clone(),
    });

    let task_network = network.clone();
    tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    if event_tx
                        .send(AppEvent::IrcMessage {
                            network: task_network.clone(),
                            message,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
                Err(e) => {
                    let _ = event_tx.send(AppEvent::IrcError {
                        network: task_network.clone(),
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }
        let _ = event_tx.send(AppEvent::IrcDisconnected {
            network: task_network,
            reason: "Connection closed".to_string(),
        });
    });

    Ok(IrcConnection { network, sender })
}
