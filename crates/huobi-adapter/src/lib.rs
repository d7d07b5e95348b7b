/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Huobi adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod types;
pub mod ws;

pub use error::{ExchangeError, HuobiError, Result};

pub use config::{CallbackMode, Endpoints, WsConfig};

// Re-export commonly used types from auth
pub use auth::{AuthScheme, Credentials, SignatureEngine, SignedRequest};

// Re-export commonly used types from http
pub use http::{ClientConfig, HuobiClient};

// Re-export all types
pub use types::*;

// Re-export commonly used types from ws
pub use ws::{
    AccountWebSocket,
    AuthState,
    Callback,
    Connection,
    ConnectionState,
    Frame,
    MarketStream,
    MarketWebSocket,
    ScriptedConnection,
    WsConnection,
};
