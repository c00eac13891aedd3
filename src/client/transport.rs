//! Live transport connection.
//!
//! One background task owns the WebSocket for the whole session. It
//! reconnects automatically, without an attempt limit, at a fixed interval,
//! and surfaces `Connected`/`Disconnected` alongside parsed inbound events
//! on a single channel so the session loop processes everything in arrival
//! order. Rejoining after a reconnect is the connection controller's job;
//! the transport only reports that a connect happened.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub url: String,
    pub reconnect_interval: Duration,
}

impl TransportConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
        }
    }
}

/// Everything the session loop can observe from the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Fired on the initial connect and on every successful reconnect.
    Connected,
    /// The connection dropped; reconnection attempts continue.
    Disconnected,
    /// A parsed inbound frame.
    Event(ServerEvent),
}

#[derive(Debug)]
enum Command {
    Send(ClientEvent),
    Close,
}

/// Handle to the transport task.
pub struct Transport {
    commands: mpsc::UnboundedSender<Command>,
}

impl Transport {
    /// Spawn the transport task. Events arrive on the returned receiver.
    pub fn connect(config: TransportConfig) -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(config, commands_rx, events_tx));
        (
            Self {
                commands: commands_tx,
            },
            events_rx,
        )
    }

    /// Queue an outbound event. Events queued while disconnected are
    /// dropped; presence is re-announced by the controller on the next
    /// connect, and the composer is disabled while offline.
    pub fn send(&self, event: ClientEvent) {
        if self.commands.send(Command::Send(event)).is_err() {
            tracing::warn!("Transport task is gone; dropping outbound event");
        }
    }

    /// Explicitly close the connection and stop reconnecting.
    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }
}

async fn run(
    config: TransportConfig,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    loop {
        let ws_stream = match connect_async(&config.url).await {
            Ok((ws_stream, _response)) => ws_stream,
            Err(e) => {
                tracing::warn!("Failed to connect to {}: {}", config.url, e);
                if wait_before_reconnect(&mut commands, config.reconnect_interval).await {
                    return;
                }
                continue;
            }
        };

        tracing::info!("Connected to {}", config.url);
        if events.send(TransportEvent::Connected).is_err() {
            return;
        }

        let closed_by_client = pump(ws_stream, &mut commands, &events).await;
        let _ = events.send(TransportEvent::Disconnected);
        if closed_by_client {
            return;
        }

        tracing::info!(
            "Connection lost; reconnecting in {:?}",
            config.reconnect_interval
        );
        if wait_before_reconnect(&mut commands, config.reconnect_interval).await {
            return;
        }
    }
}

/// Sleep out the reconnect interval while still honoring `Close`. Returns
/// `true` when the transport should shut down instead of reconnecting.
async fn wait_before_reconnect(
    commands: &mut mpsc::UnboundedReceiver<Command>,
    interval: Duration,
) -> bool {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            command = commands.recv() => match command {
                Some(Command::Send(event)) => {
                    tracing::debug!("Dropping outbound event while disconnected: {:?}", event);
                }
                Some(Command::Close) | None => return true,
            },
        }
    }
}

/// Drive one live connection. Returns `true` when the client side closed it.
async fn pump(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    events: &mpsc::UnboundedSender<TransportEvent>,
) -> bool {
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Send(event)) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        tracing::warn!("Failed to send event: {}", e);
                        return false;
                    }
                }
                Some(Command::Close) | None => {
                    let _ = write.send(Message::Close(None)).await;
                    return true;
                }
            },
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerEvent>(&text) {
                    Ok(event) => {
                        if events.send(TransportEvent::Event(event)).is_err() {
                            return true;
                        }
                    }
                    Err(e) => {
                        tracing::debug!("Ignoring unparseable frame: {} ({})", text, e);
                    }
                },
                Some(Ok(Message::Close(_))) => {
                    tracing::info!("Server closed the connection");
                    return false;
                }
                Some(Ok(_)) => {
                    // ping/pong/binary frames carry no chat events
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return false;
                }
                None => return false,
            },
        }
    }
}
