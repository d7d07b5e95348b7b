/*
[INPUT]:  A Connection, a MessageHandler and the client's subscriptions
[OUTPUT]: Decoded messages (iteration) and callback dispatch (run loop)
[POS]:    WebSocket layer - receive/keep-alive/reconnect engine shared by both clients
[UPDATE]: When changing the connection state machine or reconnect rules
*/

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::WsConfig;
use crate::error::{ExchangeError, HuobiError, Result};
use crate::ws::callback::{Callback, Dispatcher};
use crate::ws::connection::{Connection, Frame};
use crate::ws::handler::MessageHandler;
use crate::ws::registry::SubscriptionRegistry;

const RAW_LOG_MAX_BYTES: usize = 512;

/// Lifecycle of a WebSocket client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    /// Terminal; set by an explicit `close()`.
    Closed,
}

/// What the receive loop does when the stream ends under live subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReconnectPolicy {
    Resubscribe,
    Never,
}

enum Closing {
    Resumed,
    Ended,
    Failed(HuobiError),
}

pub(crate) struct Session<C, H> {
    pub(crate) connection: C,
    pub(crate) handler: H,
    pub(crate) registry: SubscriptionRegistry,
    state: ConnectionState,
    config: WsConfig,
    policy: ReconnectPolicy,
    ever_connected: bool,
    reconnects_without_frame: u32,
}

impl<C: Connection, H: MessageHandler> Session<C, H> {
    pub(crate) fn new(connection: C, handler: H, config: WsConfig, policy: ReconnectPolicy) -> Self {
        Self {
            connection,
            handler,
            registry: SubscriptionRegistry::new(),
            state: ConnectionState::Disconnected,
            config,
            policy,
            ever_connected: false,
            reconnects_without_frame: 0,
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.state
    }

    pub(crate) async fn connect(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Err(HuobiError::ConnectionClosed);
        }
        let resuming = self.ever_connected && self.state == ConnectionState::Disconnected;
        self.connection.connect().await?;
        self.state = ConnectionState::Connected;
        self.ever_connected = true;
        self.reconnects_without_frame = 0;
        if resuming && !self.registry.is_empty() {
            info!(topics = self.registry.len(), "ws resubscribing on new connection");
            self.send_subscriptions().await?;
        }
        Ok(())
    }

    pub(crate) async fn ensure_connected(&mut self) -> Result<()> {
        match self.state {
            ConnectionState::Connected => Ok(()),
            ConnectionState::Disconnected => self.connect().await,
            ConnectionState::Closed => Err(HuobiError::ConnectionClosed),
        }
    }

    pub(crate) async fn send(&mut self, message: &Value) -> Result<()> {
        self.ensure_connected().await?;
        self.connection.send(message).await
    }

    pub(crate) async fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;
        self.connection.close().await
    }

    /// Read exactly one frame and decode it without keep-alive or error handling.
    pub(crate) async fn receive_reply(&mut self) -> Result<Value> {
        let frame = self.connection.receive(self.config.receive_timeout).await?;
        if frame.is_closing() {
            return Err(HuobiError::WebSocket(
                "connection closed while awaiting a reply".to_string(),
            ));
        }
        self.handler.decode(&frame)
    }

    /// Next consumer-visible message.
    ///
    /// Keep-alives are answered and skipped. Exchange error frames come back as
    /// `Some(Err(HuobiError::Exchange(_)))` and iteration may continue after them. `None` means
    /// the stream ended without a viable reconnect.
    pub(crate) async fn next_message(&mut self) -> Option<Result<Value>> {
        match self.state {
            ConnectionState::Closed => return None,
            ConnectionState::Disconnected if self.ever_connected => return None,
            ConnectionState::Disconnected => return Some(Err(HuobiError::NotConnected)),
            ConnectionState::Connected => {}
        }

        loop {
            let frame = match self.connection.receive(self.config.receive_timeout).await {
                Ok(frame) if !frame.is_closing() => frame,
                Ok(_) => match self.on_closing().await {
                    Closing::Resumed => continue,
                    Closing::Ended => return None,
                    Closing::Failed(err) => return Some(Err(err)),
                },
                Err(err) if err.is_transport() => {
                    warn!(error = %err, "ws receive failed");
                    match self.on_closing().await {
                        Closing::Resumed => continue,
                        Closing::Ended => return None,
                        Closing::Failed(err) => return Some(Err(err)),
                    }
                }
                Err(err) => return Some(Err(err)),
            };
            self.reconnects_without_frame = 0;

            let message = match self.handler.decode(&frame) {
                Ok(message) => message,
                Err(err) => {
                    log_undecodable(&frame, &err);
                    return Some(Err(err));
                }
            };

            match self.handler.keepalive_token(&message) {
                Ok(Some(token)) => {
                    let pong = self.handler.pong(token);
                    if let Err(err) = self.connection.send(&pong).await {
                        return Some(Err(err));
                    }
                    debug!(token, "ws keep-alive answered");
                    continue;
                }
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }

            if let Err(err) = self.handler.check_error(&message) {
                if let Some(exchange) = err.exchange() {
                    warn!(code = %exchange.code, message = %exchange.message, "ws error frame");
                }
                return Some(Err(err));
            }
            return Some(Ok(message));
        }
    }

    async fn on_closing(&mut self) -> Closing {
        let resumable = self.policy == ReconnectPolicy::Resubscribe
            && self.state != ConnectionState::Closed
            && !self.connection.is_closed()
            && !self.registry.is_empty();
        if !resumable {
            debug!("ws stream ended");
            self.state = ConnectionState::Disconnected;
            if self.policy == ReconnectPolicy::Never {
                // the server forgets a private session's subscriptions with the socket
                self.registry.clear();
            }
            return Closing::Ended;
        }
        if self.reconnects_without_frame >= self.config.max_reconnect_attempts {
            warn!(
                attempts = self.reconnects_without_frame,
                "ws reconnect attempts exhausted"
            );
            self.state = ConnectionState::Disconnected;
            return Closing::Ended;
        }

        self.reconnects_without_frame += 1;
        info!(
            attempt = self.reconnects_without_frame,
            topics = self.registry.len(),
            "ws reconnecting"
        );
        match self.resubscribe().await {
            Ok(()) => Closing::Resumed,
            Err(err) => {
                warn!(error = %err, "ws reconnect failed");
                self.state = ConnectionState::Disconnected;
                Closing::Failed(err)
            }
        }
    }

    async fn resubscribe(&mut self) -> Result<()> {
        self.connection.connect().await?;
        self.state = ConnectionState::Connected;
        self.send_subscriptions().await
    }

    /// Send a subscribe frame for every registered topic on the current connection.
    async fn send_subscriptions(&mut self) -> Result<()> {
        let frames: Vec<Value> = self
            .registry
            .topics()
            .map(|topic| self.handler.subscribe_frame(topic))
            .collect();
        for frame in &frames {
            self.connection.send(frame).await?;
        }
        Ok(())
    }

    /// Drain the stream, routing each message to its topic callback.
    ///
    /// Exchange error frames go to `on_error` and the loop continues. A message without a
    /// topic or without a registered callback stops the loop with an error.
    pub(crate) async fn run_with_callbacks(
        &mut self,
        on_error: Callback<ExchangeError>,
    ) -> Result<()> {
        let mut dispatcher = Dispatcher::new(self.config.callback_mode);
        let outcome = loop {
            let Some(item) = self.next_message().await else {
                break Ok(());
            };
            match item {
                Ok(message) => {
                    if let Err(err) = self.route(&mut dispatcher, message).await {
                        break Err(err);
                    }
                }
                Err(HuobiError::Exchange(err)) => dispatcher.dispatch(None, &on_error, err).await,
                Err(err) => break Err(err),
            }
        };
        dispatcher.finish().await;
        outcome
    }

    async fn route(&self, dispatcher: &mut Dispatcher, message: Value) -> Result<()> {
        let topic = self
            .handler
            .topic_of(&message)
            .ok_or_else(|| HuobiError::Routing(format!("cannot find topic in message {message}")))?
            .to_string();
        let callback = self
            .registry
            .callback_for(&topic)
            .cloned()
            .ok_or_else(|| HuobiError::MissingCallback {
                topic: topic.clone(),
            })?;
        dispatcher.dispatch(Some(&topic), &callback, message).await;
        Ok(())
    }
}

fn log_undecodable(frame: &Frame, err: &HuobiError) {
    let preview = match frame {
        Frame::Text(text) => truncate_for_log(text, RAW_LOG_MAX_BYTES),
        Frame::Binary(bytes) => format!("<{} bytes>", bytes.len()),
        Frame::Close => "<close>".to_string(),
    };
    warn!(error = %err, message = %preview, "ws frame decode failed");
}

fn truncate_for_log(raw: &str, max_bytes: usize) -> String {
    if raw.len() <= max_bytes {
        return raw.to_string();
    }
    let mut end = max_bytes;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...<truncated {} bytes>", &raw[..end], raw.len() - end)
}
