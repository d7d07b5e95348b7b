/*
[INPUT]:  Environment overrides and caller-supplied options
[OUTPUT]: Endpoint URLs and WebSocket client options
[POS]:    Configuration layer - shared by REST and WebSocket clients
[UPDATE]: When adding endpoints or connection options
*/

use std::env;
use std::time::Duration;

pub const DEFAULT_REST_URL: &str = "https://api.huobi.pro";
pub const DEFAULT_MARKET_WS_URL: &str = "wss://api.huobi.pro/ws";
pub const DEFAULT_MARKET_FEED_WS_URL: &str = "wss://api.huobi.pro/feed";
pub const DEFAULT_ACCOUNT_WS_URL: &str = "wss://api.huobi.pro/ws/v2";

const ENV_REST_URL: &str = "HUOBI_API_URL";
const ENV_MARKET_WS_URL: &str = "HUOBI_WS_MARKET_URL";
const ENV_MARKET_FEED_WS_URL: &str = "HUOBI_WS_MARKET_FEED_URL";
const ENV_ACCOUNT_WS_URL: &str = "HUOBI_WS_ACCOUNT_URL";

/// Exchange endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub rest_url: String,
    pub market_ws_url: String,
    /// Market-by-price incremental feed
    pub market_feed_ws_url: String,
    pub account_ws_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rest_url: DEFAULT_REST_URL.to_string(),
            market_ws_url: DEFAULT_MARKET_WS_URL.to_string(),
            market_feed_ws_url: DEFAULT_MARKET_FEED_WS_URL.to_string(),
            account_ws_url: DEFAULT_ACCOUNT_WS_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Defaults, overridden by `HUOBI_*` environment variables when present.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: String| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(fallback)
        };
        Self {
            rest_url: pick(ENV_REST_URL, defaults.rest_url),
            market_ws_url: pick(ENV_MARKET_WS_URL, defaults.market_ws_url),
            market_feed_ws_url: pick(ENV_MARKET_FEED_WS_URL, defaults.market_feed_ws_url),
            account_ws_url: pick(ENV_ACCOUNT_WS_URL, defaults.account_ws_url),
        }
    }
}

/// How asynchronous callbacks are driven by the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackMode {
    /// Await every callback before reading the next frame.
    #[default]
    Inline,
    /// Hand callbacks to per-topic worker tasks; topics progress independently.
    Background,
}

/// WebSocket client options
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Applied to every `receive`; `None` waits forever.
    pub receive_timeout: Option<Duration>,
    pub callback_mode: CallbackMode,
    /// Consecutive reconnects allowed without any frame arriving in between.
    pub max_reconnect_attempts: u32,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            receive_timeout: None,
            callback_mode: CallbackMode::Inline,
            max_reconnect_attempts: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_endpoint_defaults() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.rest_url, "https://api.huobi.pro");
        assert_eq!(endpoints.market_ws_url, "wss://api.huobi.pro/ws");
        assert_eq!(endpoints.account_ws_url, "wss://api.huobi.pro/ws/v2");
    }

    #[test]
    fn test_endpoint_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("HUOBI_API_URL", "https://api-aws.huobi.pro"),
            ("HUOBI_WS_ACCOUNT_URL", "  "),
        ]);
        let endpoints = Endpoints::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(endpoints.rest_url, "https://api-aws.huobi.pro");
        assert_eq!(endpoints.account_ws_url, DEFAULT_ACCOUNT_WS_URL);
        assert_eq!(endpoints.market_feed_ws_url, DEFAULT_MARKET_FEED_WS_URL);
    }

    #[test]
    fn test_ws_config_default() {
        let config = WsConfig::default();
        assert!(config.receive_timeout.is_none());
        assert_eq!(config.callback_mode, CallbackMode::Inline);
        assert_eq!(config.max_reconnect_attempts, 1);
    }
}
