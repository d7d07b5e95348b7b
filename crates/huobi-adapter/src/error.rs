/*
[INPUT]:  Error sources (HTTP, exchange frames, serialization, auth, WebSocket transport)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use thiserror::Error;

/// Error reported by the exchange itself, either in a WebSocket frame or a REST envelope.
///
/// Market frames carry string codes (`"bad-request"`), private frames carry numeric ones
/// (`2001`); both are kept as strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("error code \"{code}\" with message \"{message}\"")]
pub struct ExchangeError {
    pub code: String,
    pub message: String,
}

impl ExchangeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Main error type for the Huobi adapter
#[derive(Error, Debug)]
pub enum HuobiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Exchange reported an error (error frame or REST error envelope)
    #[error("exchange error: {0}")]
    Exchange(ExchangeError),

    /// WebSocket authentication handshake was rejected
    #[error("Authentication failed (code {code}): {message}")]
    Authentication { code: String, message: String },

    /// Private subscription attempted before `authorize()`
    #[error("connection is not authenticated")]
    NotAuthenticated,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Gzip payload could not be inflated or deflated
    #[error("Gzip error: {0}")]
    Gzip(#[source] std::io::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Frame decoded but did not have the shape the protocol requires
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Message topic could not be determined
    #[error("Routing error: {0}")]
    Routing(String),

    /// Message arrived for a topic without a registered callback
    #[error("no callback registered for topic \"{topic}\"")]
    MissingCallback { topic: String },

    /// Configuration error (credentials, URLs)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller passed an argument outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// `receive` was called before the connection was ever opened
    #[error("WebSocket is not connected")]
    NotConnected,

    /// Client was closed explicitly and cannot be reused
    #[error("WebSocket client is closed")]
    ConnectionClosed,

    /// Receive timed out
    #[error("Receive timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

impl HuobiError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HuobiError::Http(_) | HuobiError::Timeout { .. } | HuobiError::WebSocket(_)
        )
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            HuobiError::Authentication { .. } | HuobiError::NotAuthenticated
        )
    }

    /// Transport-level conditions the receive loop treats like a closing frame.
    pub fn is_transport(&self) -> bool {
        matches!(self, HuobiError::WebSocket(_) | HuobiError::Timeout { .. })
    }

    /// Exchange error payload, if this is one.
    pub fn exchange(&self) -> Option<&ExchangeError> {
        match self {
            HuobiError::Exchange(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExchangeError> for HuobiError {
    fn from(err: ExchangeError) -> Self {
        HuobiError::Exchange(err)
    }
}

/// Result type alias for Huobi operations
pub type Result<T> = std::result::Result<T, HuobiError>;
