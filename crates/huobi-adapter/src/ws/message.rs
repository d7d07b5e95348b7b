/*
[INPUT]:  Decoded JSON messages from the market and private streams
[OUTPUT]: Typed push envelopes and tick payloads
[POS]:    WebSocket layer - optional typed views over dispatched messages
[UPDATE]: When adding new tick types or changing push formats
*/

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Market data push: `{"ch": ..., "ts": ..., "tick": {...}}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketPush<T> {
    pub ch: String,
    pub ts: i64,
    pub tick: T,
}

/// Private stream push: `{"action": "push", "ch": ..., "data": {...}}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountPush<T> {
    pub action: String,
    pub ch: String,
    pub data: T,
}

/// Parse a dispatched message into a typed envelope.
pub fn parse_message<T: DeserializeOwned>(message: &Value) -> Result<T> {
    Ok(T::deserialize(message)?)
}

/// Candlestick tick
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CandleTick {
    pub id: i64,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: i64,
}

/// Best bid/offer tick
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BboTick {
    pub symbol: String,
    pub quote_time: i64,
    pub bid: f64,
    pub bid_size: f64,
    pub ask: f64,
    pub ask_size: f64,
    pub seq_id: i64,
}

/// Order book snapshot: `[price, size]` levels
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepthTick {
    pub bids: Vec<[f64; 2]>,
    pub asks: Vec<[f64; 2]>,
    pub version: Option<i64>,
    pub ts: Option<i64>,
}

/// Order update from `orders#<symbol>`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub event_type: String,
    pub symbol: String,
    pub order_id: Option<i64>,
    pub client_order_id: Option<String>,
    pub order_status: Option<String>,
    pub order_price: Option<String>,
    pub order_size: Option<String>,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_candle_push() {
        let message = json!({
            "ch": "market.btcusdt.kline.1min",
            "ts": 1_489_474_082_831_i64,
            "tick": {
                "id": 1_489_464_480, "amount": 0.0, "count": 0, "open": 7962.62,
                "close": 7962.62, "low": 7962.62, "high": 7962.62, "vol": 0.0
            }
        });
        let push: MarketPush<CandleTick> = parse_message(&message).unwrap();
        assert_eq!(push.ch, "market.btcusdt.kline.1min");
        assert_eq!(push.tick.open, 7962.62);
    }

    #[test]
    fn test_parse_order_push() {
        let message = json!({
            "action": "push",
            "ch": "orders#btcusdt",
            "data": {
                "eventType": "creation",
                "symbol": "btcusdt",
                "orderId": 123,
                "clientOrderId": "c-1",
                "orderStatus": "submitted",
                "orderPrice": "20000",
                "orderSize": "0.01",
                "type": "buy-limit"
            }
        });
        let push: AccountPush<OrderUpdate> = parse_message(&message).unwrap();
        assert_eq!(push.data.order_id, Some(123));
        assert_eq!(push.data.order_type.as_deref(), Some("buy-limit"));
    }

    #[test]
    fn test_parse_mismatch_is_error() {
        let result: Result<MarketPush<BboTick>> = parse_message(&json!({"ch": "x"}));
        assert!(result.is_err());
    }
}
