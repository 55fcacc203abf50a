//! Live order channel
//!
//! Connects to the backend's STOMP endpoint, subscribes to order updates and
//! fans every received order out over a broadcast channel. Consumers merge
//! updates by order id; the last message wins.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use reqwest::Url;
use shared::message::{
    Command, Frame, ORDER_TOPIC, SUBSCRIBE_DESTINATION, SubscriptionIntent,
};
use shared::models::Order;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::{ClientConfig, ClientError, ClientResult};

/// How long to wait for CONNECTED after sending CONNECT
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Live channel settings
#[derive(Debug, Clone)]
pub struct LiveConfig {
    pub ws_url: String,
    /// Virtual host sent in CONNECT
    pub host: String,
    /// Heart-beat interval offered to the server (0 disables)
    pub heartbeat_ms: u32,
    pub client_name: Option<String>,
    pub token: Option<String>,
    pub channel_capacity: usize,
}

impl LiveConfig {
    pub fn new(ws_url: impl Into<String>) -> Self {
        let ws_url = ws_url.into();
        let host = host_of(&ws_url).unwrap_or_else(|| "localhost".to_string());
        Self {
            ws_url,
            host,
            heartbeat_ms: 10_000,
            client_name: None,
            token: None,
            channel_capacity: 256,
        }
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn with_heartbeat(mut self, heartbeat_ms: u32) -> Self {
        self.heartbeat_ms = heartbeat_ms;
        self
    }
}

impl From<&ClientConfig> for LiveConfig {
    fn from(config: &ClientConfig) -> Self {
        let mut live = LiveConfig::new(config.ws_url.clone());
        live.token = config.token.clone();
        live
    }
}

/// Host part of `url`, without userinfo or port
fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}

/// What a single inbound frame means for the subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// An order was created or changed
    Update(Order),
    /// The server reported an ERROR frame
    ServerError(String),
    /// Receipts, heart-beats and frames for other destinations
    Ignored,
}

/// Interpret an inbound frame
pub fn handle_frame(frame: &Frame) -> LiveEvent {
    match frame.command {
        Command::Message => {
            if frame.get("destination").is_some_and(|d| d != ORDER_TOPIC) {
                return LiveEvent::Ignored;
            }
            match serde_json::from_str::<Order>(&frame.body) {
                Ok(order) => LiveEvent::Update(order),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding malformed order update");
                    LiveEvent::Ignored
                }
            }
        }
        Command::Error => {
            let message = frame
                .get("message")
                .map(str::to_string)
                .unwrap_or_else(|| frame.body.clone());
            LiveEvent::ServerError(message)
        }
        _ => LiveEvent::Ignored,
    }
}

/// Read frames until CONNECTED; an ERROR frame refuses the session
async fn await_connected<S>(stream: &mut S) -> ClientResult<Frame>
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg) = stream.next().await {
        let Message::Text(text) = msg? else {
            continue;
        };
        let Some(frame) = Frame::decode(text.as_str())? else {
            continue;
        };
        match frame.command {
            Command::Connected => return Ok(frame),
            Command::Error => {
                return Err(ClientError::Protocol(
                    frame.get("message").unwrap_or("connect refused").to_string(),
                ));
            }
            other => {
                tracing::debug!(command = %other, "Unexpected frame before CONNECTED");
            }
        }
    }
    Err(ClientError::Protocol("closed during handshake".to_string()))
}

/// A running subscription to the live order channel
pub struct LiveClient {
    updates: broadcast::Sender<Order>,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl LiveClient {
    /// Connect, subscribe to order updates and start the reader task
    pub async fn connect(config: LiveConfig) -> ClientResult<Self> {
        tracing::info!(url = %config.ws_url, "Connecting to live order channel");
        let (ws, _) = tokio_tungstenite::connect_async(config.ws_url.as_str()).await?;
        let (mut sink, mut stream) = ws.split();

        let mut connect = Frame::connect(&config.host, config.heartbeat_ms);
        if let Some(token) = &config.token {
            connect = connect.header("Authorization", format!("Bearer {token}"));
        }
        sink.send(Message::Text(connect.encode().into())).await?;

        let connected = tokio::time::timeout(HANDSHAKE_TIMEOUT, await_connected(&mut stream))
            .await
            .map_err(|_| ClientError::Protocol("handshake timed out".to_string()))??;
        tracing::debug!(version = ?connected.get("version"), "STOMP session established");

        let subscription_id = format!("sub-{}", uuid::Uuid::new_v4());
        let subscribe = Frame::subscribe(&subscription_id, ORDER_TOPIC);
        sink.send(Message::Text(subscribe.encode().into())).await?;

        let intent = Frame::send(SUBSCRIBE_DESTINATION)
            .json_body(&SubscriptionIntent::orders(config.client_name.clone()))?;
        sink.send(Message::Text(intent.encode().into())).await?;
        tracing::info!(topic = ORDER_TOPIC, "Subscribed to order updates");

        let (updates, _) = broadcast::channel(config.channel_capacity.max(1));
        let shutdown = CancellationToken::new();

        let tx = updates.clone();
        let token = shutdown.clone();
        let heartbeat = Duration::from_millis(u64::from(config.heartbeat_ms));
        let handle = tokio::spawn(async move {
            let mut beat = tokio::time::interval(if heartbeat.is_zero() {
                Duration::from_secs(3600)
            } else {
                heartbeat
            });
            beat.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        let receipt = format!("bye-{}", uuid::Uuid::new_v4());
                        let _ = sink
                            .send(Message::Text(Frame::disconnect(&receipt).encode().into()))
                            .await;
                        let _ = sink.close().await;
                        tracing::info!("Live order channel closed");
                        return;
                    }

                    _ = beat.tick(), if !heartbeat.is_zero() => {
                        if sink.send(Message::Text("\n".into())).await.is_err() {
                            tracing::warn!("Heart-beat failed, live channel lost");
                            return;
                        }
                    }

                    msg = stream.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                let frame = match Frame::decode(text.as_str()) {
                                    Ok(Some(frame)) => frame,
                                    Ok(None) => continue,
                                    Err(e) => {
                                        tracing::warn!(error = %e, "Undecodable frame");
                                        continue;
                                    }
                                };
                                match handle_frame(&frame) {
                                    LiveEvent::Update(order) => {
                                        tracing::debug!(order_id = order.id, status = ?order.status, "Order update");
                                        // No receivers is fine
                                        let _ = tx.send(order);
                                    }
                                    LiveEvent::ServerError(message) => {
                                        tracing::error!(%message, "Live channel error frame");
                                        return;
                                    }
                                    LiveEvent::Ignored => {}
                                }
                            }
                            Some(Ok(Message::Ping(data))) => {
                                let _ = sink.send(Message::Pong(data)).await;
                            }
                            Some(Ok(Message::Close(_))) => {
                                tracing::info!("Live channel closed by server");
                                return;
                            }
                            Some(Err(e)) => {
                                tracing::warn!("Live channel error: {e}");
                                return;
                            }
                            None => {
                                tracing::info!("Live channel stream ended");
                                return;
                            }
                            _ => {}
                        }
                    }
                }
            }
        });

        Ok(Self {
            updates,
            shutdown,
            handle,
        })
    }

    /// New receiver of order updates
    pub fn subscribe(&self) -> broadcast::Receiver<Order> {
        self.updates.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Send DISCONNECT and wait for the reader task to stop
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("Live reader task failed: {e}");
        }
    }
}
