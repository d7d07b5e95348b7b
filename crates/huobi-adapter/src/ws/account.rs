/*
[INPUT]:  Account WebSocket URL or Connection, Credentials, private topics
[OUTPUT]: Authenticated private session with order/trade/balance streams
[POS]:    WebSocket layer - private account and order client
[UPDATE]: When changing the auth handshake or private topics
*/

use futures_util::Stream;
use futures_util::stream;
use reqwest::Method;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::auth::{Credentials, SignedRequest};
use crate::config::WsConfig;
use crate::error::{ExchangeError, HuobiError, Result};
use crate::types::TradeDetailMode;
use crate::ws::callback::Callback;
use crate::ws::connection::{Connection, WsConnection};
use crate::ws::handler::{MessageHandler, PrivateHandler};
use crate::ws::session::{ConnectionState, ReconnectPolicy, Session};
use crate::ws::topic;

/// Authentication state of the private session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated,
}

/// Client for the private account/order stream.
///
/// Call [`AccountWebSocket::authorize`] before subscribing. The stream ends when the server
/// closes the socket; a private session is never resumed automatically.
pub struct AccountWebSocket<C = WsConnection> {
    session: Session<C, PrivateHandler>,
    credentials: Credentials,
    auth: AuthState,
}

impl AccountWebSocket<WsConnection> {
    pub fn new(url: &str, credentials: Credentials) -> Self {
        Self::with_config(url, credentials, WsConfig::default())
    }

    pub fn with_config(url: &str, credentials: Credentials, config: WsConfig) -> Self {
        Self::with_connection(WsConnection::new(url), credentials, config)
    }
}

impl<C: Connection> AccountWebSocket<C> {
    pub fn with_connection(connection: C, credentials: Credentials, config: WsConfig) -> Self {
        Self {
            session: Session::new(connection, PrivateHandler, config, ReconnectPolicy::Never),
            credentials,
            auth: AuthState::Unauthenticated,
        }
    }

    pub fn connection(&self) -> &C {
        &self.session.connection
    }

    pub fn state(&self) -> ConnectionState {
        self.session.state()
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth
    }

    pub fn topics(&self) -> Vec<String> {
        self.session.registry.topics().map(str::to_string).collect()
    }

    pub async fn connect(&mut self) -> Result<()> {
        self.session.connect().await
    }

    pub async fn close(&mut self) -> Result<()> {
        self.auth = AuthState::Unauthenticated;
        self.session.close().await
    }

    /// Send a signed auth request and wait for its single reply.
    pub async fn authorize(&mut self) -> Result<()> {
        let mut request = SignedRequest::websocket(&self.credentials);
        request.sign(&Method::GET, self.session.connection.url(), &self.credentials)?;
        let frame = json!({
            "action": "req",
            "ch": "auth",
            "params": request.to_json(),
        });

        self.auth = AuthState::Unauthenticated;
        self.session.send(&frame).await?;
        let reply = self.session.receive_reply().await?;

        let code = reply.get("code").and_then(Value::as_i64).ok_or_else(|| {
            HuobiError::InvalidResponse(format!("auth reply without code: {reply}"))
        })?;
        if code != 200 {
            let message = reply
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            warn!(code, message = %message, "ws auth rejected");
            return Err(HuobiError::Authentication {
                code: code.to_string(),
                message,
            });
        }

        self.auth = AuthState::Authenticated;
        info!(access_key = %self.credentials.access_key(), "ws auth succeeded");
        Ok(())
    }

    /// Register `topic` and send `{"action": "sub", "ch": topic}`.
    pub async fn subscribe(&mut self, topic: &str, callback: Option<Callback<Value>>) -> Result<()> {
        self.require_auth()?;
        self.session.registry.register(topic, callback);
        let frame = self.session.handler.subscribe_frame(topic);
        self.session.send(&frame).await?;
        info!(topic, "ws subscribe sent");
        Ok(())
    }

    pub async fn unsubscribe(&mut self, topic: &str) -> Result<()> {
        self.require_auth()?;
        self.session.registry.unregister(topic);
        let frame = self.session.handler.unsubscribe_frame(topic);
        self.session.send(&frame).await?;
        info!(topic, "ws unsubscribe sent");
        Ok(())
    }

    /// `orders#<symbol>`; `*` subscribes every symbol.
    pub async fn subscribe_order_updates(
        &mut self,
        symbol: &str,
        callback: Option<Callback<Value>>,
    ) -> Result<()> {
        let topic = topic::order_updates(symbol)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn subscribe_trade_detail(
        &mut self,
        symbol: &str,
        mode: TradeDetailMode,
        callback: Option<Callback<Value>>,
    ) -> Result<()> {
        let topic = topic::trade_clearing(symbol, mode)?;
        self.subscribe(&topic, callback).await
    }

    /// `mode` must be 0, 1 or 2.
    pub async fn subscribe_account_change(
        &mut self,
        mode: u8,
        callback: Option<Callback<Value>>,
    ) -> Result<()> {
        let topic = topic::account_change(mode)?;
        self.subscribe(&topic, callback).await
    }

    pub async fn next_message(&mut self) -> Option<Result<Value>> {
        self.session.next_message().await
    }

    pub fn messages(&mut self) -> impl Stream<Item = Result<Value>> + '_ {
        stream::unfold(self, |client| async move {
            client.next_message().await.map(|item| (item, client))
        })
    }

    pub async fn run_with_callbacks(&mut self, on_error: Callback<ExchangeError>) -> Result<()> {
        self.session.run_with_callbacks(on_error).await
    }

    fn require_auth(&mut self) -> Result<()> {
        // a new socket carries no authentication
        if self.session.state() != ConnectionState::Connected {
            self.auth = AuthState::Unauthenticated;
        }
        match self.auth {
            AuthState::Authenticated => Ok(()),
            AuthState::Unauthenticated => Err(HuobiError::NotAuthenticated),
        }
    }
}
