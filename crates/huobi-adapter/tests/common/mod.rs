/*
[INPUT]:  Test configuration, scripted frames and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for huobi-adapter tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use huobi_adapter::{
    AccountWebSocket, Callback, Credentials, Frame, MarketWebSocket, ScriptedConnection, WsConfig,
};
use serde_json::Value;
use wiremock::MockServer;

pub const MARKET_URL: &str = "wss://api.huobi.pro/ws";
pub const ACCOUNT_URL: &str = "wss://api.huobi.pro/ws/v2";
pub const ACCESS_KEY: &str = "test-access-key";
pub const SECRET_KEY: &str = "test-secret-key";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new(ACCESS_KEY, SECRET_KEY).expect("test credentials")
}

/// Gzip-compressed market frame
pub fn gz(value: Value) -> Frame {
    Frame::gzip_json(&value).expect("gzip frame")
}

/// Plain JSON private-stream frame
pub fn text(value: Value) -> Frame {
    Frame::json(&value)
}

pub fn market_client(frames: Vec<Frame>) -> MarketWebSocket<ScriptedConnection> {
    market_client_with(frames, WsConfig::default())
}

pub fn market_client_with(
    frames: Vec<Frame>,
    config: WsConfig,
) -> MarketWebSocket<ScriptedConnection> {
    MarketWebSocket::with_connection(ScriptedConnection::new(MARKET_URL, frames), config)
}

pub fn account_client(frames: Vec<Frame>) -> AccountWebSocket<ScriptedConnection> {
    AccountWebSocket::with_connection(
        ScriptedConnection::new(ACCOUNT_URL, frames),
        test_credentials(),
        WsConfig::default(),
    )
}

/// Sync callback that records every message it receives.
pub fn recorder<T: Send + 'static>() -> (Callback<T>, Arc<Mutex<Vec<T>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback = Callback::sync(move |value| sink.lock().unwrap().push(value));
    (callback, seen)
}

/// Async callback that records every message it receives after yielding once.
pub fn async_recorder<T: Send + 'static>() -> (Callback<T>, Arc<Mutex<Vec<T>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback = Callback::from_async(move |value| {
        let sink = sink.clone();
        async move {
            tokio::task::yield_now().await;
            sink.lock().unwrap().push(value);
        }
    });
    (callback, seen)
}
