/*
[INPUT]:  Market WebSocket URL or Connection, stream parameters, callbacks
[OUTPUT]: Subscribed market streams, decoded messages, dispatched callbacks
[POS]:    WebSocket layer - public market data client
[UPDATE]: When adding market streams or changing subscription framing
*/

use futures_util::Stream;
use futures_util::stream;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::config::WsConfig;
use crate::error::{ExchangeError, Result};
use crate::types::{DepthLevel, PriceLevel};
use crate::ws::callback::Callback;
use crate::ws::connection::{Connection, WsConnection};
use crate::ws::handler::{MarketHandler, MessageHandler};
use crate::ws::session::{ConnectionState, ReconnectPolicy, Session};
use crate::ws::topic;

/// Client for the public market stream.
///
/// Reconnects and resubscribes when the server drops the socket while topics are live. Not
/// safe to drive from two tasks at once; subscribe calls and iteration must be serialized by
/// the caller.
pub struct MarketWebSocket<C = WsConnection> {
    session: Session<C, MarketHandler>,
}

impl MarketWebSocket<WsConnection> {
    pub fn new(url: &str) -> Self {
        Self::with_config(url, WsConfig::default())
    }

    pub fn with_config(url: &str, config: WsConfig) -> Self {
        Self::with_connection(WsConnection::new(url), config)
    }
}

impl<C: Connection> MarketWebSocket<C> {
    pub fn with_connection(connection: C, config: WsConfig) -> Self {
        Self {
            session: Session::new(connection, MarketHandler, config, ReconnectPolicy::Resubscribe),
        }
    }

    pub fn connection(&self) -> &C {
        &self.session.connection
    }

    pub fn state(&self) -> ConnectionState {
        self.session.state()
    }

    /// Currently subscribed topics.
    pub fn topics(&self) -> Vec<String> {
        self.session.registry.topics().map(str::to_string).collect()
    }

    pub async fn connect(&mut self) -> Result<()> {
        self.session.connect().await
    }

    /// Close the socket. The client cannot be reconnected afterwards.
    pub async fn close(&mut self) -> Result<()> {
        self.session.close().await
    }

    pub fn candlestick(
        &mut self,
        symbol: &str,
        interval: impl AsRef<str>,
    ) -> Result<MarketStream<'_, C>> {
        let topic = topic::candlestick(symbol, interval)?;
        Ok(self.stream(topic))
    }

    pub fn ticker(&mut self, symbol: &str) -> Result<MarketStream<'_, C>> {
        let topic = topic::ticker(symbol)?;
        Ok(self.stream(topic))
    }

    pub fn orderbook(&mut self, symbol: &str, level: DepthLevel) -> Result<MarketStream<'_, C>> {
        let topic = topic::orderbook(symbol, level)?;
        Ok(self.stream(topic))
    }

    pub fn best_bid_offer(&mut self, symbol: &str) -> Result<MarketStream<'_, C>> {
        let topic = topic::best_bid_offer(symbol)?;
        Ok(self.stream(topic))
    }

    pub fn trade_detail(&mut self, symbol: &str) -> Result<MarketStream<'_, C>> {
        let topic = topic::trade_detail(symbol)?;
        Ok(self.stream(topic))
    }

    pub fn market_detail(&mut self, symbol: &str) -> Result<MarketStream<'_, C>> {
        let topic = topic::market_detail(symbol)?;
        Ok(self.stream(topic))
    }

    pub fn etp(&mut self, symbol: &str) -> Result<MarketStream<'_, C>> {
        let topic = topic::etp(symbol)?;
        Ok(self.stream(topic))
    }

    /// Market-by-price refresh; usually served from the `/feed` endpoint.
    pub fn mbp_refresh(&mut self, symbol: &str, level: PriceLevel) -> Result<MarketStream<'_, C>> {
        let topic = topic::mbp_refresh(symbol, level)?;
        Ok(self.stream(topic))
    }

    /// Handle for an arbitrary, already canonical topic.
    pub fn stream(&mut self, topic: impl Into<String>) -> MarketStream<'_, C> {
        MarketStream {
            client: self,
            topic: topic.into(),
            id: None,
        }
    }

    /// Register `topic` and send `{"sub": topic}`, with `"id"` when given.
    pub async fn subscribe(
        &mut self,
        topic: &str,
        callback: Option<Callback<Value>>,
        id: Option<&str>,
    ) -> Result<()> {
        self.session.ensure_connected().await?;
        self.session.registry.register(topic, callback);
        let frame = with_id(self.session.handler.subscribe_frame(topic), id);
        self.session.send(&frame).await?;
        info!(topic, id, "ws subscribe sent");
        Ok(())
    }

    /// Unregister `topic` and send `{"unsub": topic}`.
    ///
    /// The topic is dropped from the registry even if sending fails, so a later reconnect
    /// does not bring it back.
    pub async fn unsubscribe(&mut self, topic: &str, id: Option<&str>) -> Result<()> {
        self.session.registry.unregister(topic);
        let frame = with_id(self.session.handler.unsubscribe_frame(topic), id);
        self.session.send(&frame).await?;
        info!(topic, id, "ws unsubscribe sent");
        Ok(())
    }

    /// Unsubscribe every registered topic. Sends nothing once the transport is closed.
    pub async fn unsubscribe_all(&mut self) -> Result<()> {
        let topics = self.topics();
        self.session.registry.clear();
        if self.session.state() != ConnectionState::Connected || self.session.connection.is_closed()
        {
            return Ok(());
        }
        for topic in &topics {
            let frame = self.session.handler.unsubscribe_frame(topic);
            self.session.send(&frame).await?;
        }
        info!(count = topics.len(), "ws unsubscribe all sent");
        Ok(())
    }

    /// Next decoded message; `None` once the stream has ended.
    pub async fn next_message(&mut self) -> Option<Result<Value>> {
        self.session.next_message().await
    }

    /// Messages as a [`Stream`], see [`MarketWebSocket::next_message`].
    pub fn messages(&mut self) -> impl Stream<Item = Result<Value>> + '_ {
        stream::unfold(self, |client| async move {
            client.next_message().await.map(|item| (item, client))
        })
    }

    /// Route every message to its topic callback until the stream ends.
    pub async fn run_with_callbacks(&mut self, on_error: Callback<ExchangeError>) -> Result<()> {
        self.session.run_with_callbacks(on_error).await
    }
}

/// One market topic, ready to be subscribed or unsubscribed.
pub struct MarketStream<'a, C> {
    client: &'a mut MarketWebSocket<C>,
    topic: String,
    id: Option<String>,
}

impl<'a, C: Connection> MarketStream<'a, C> {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Correlation id echoed back in the ack.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn random_id(self) -> Self {
        self.id(Uuid::new_v4().to_string())
    }

    pub async fn sub(self, callback: Option<Callback<Value>>) -> Result<()> {
        self.client
            .subscribe(&self.topic, callback, self.id.as_deref())
            .await
    }

    pub async fn unsub(self) -> Result<()> {
        self.client
            .unsubscribe(&self.topic, self.id.as_deref())
            .await
    }
}

fn with_id(mut frame: Value, id: Option<&str>) -> Value {
    if let (Some(id), Some(object)) = (id, frame.as_object_mut()) {
        object.insert("id".to_string(), Value::String(id.to_string()));
    }
    frame
}
