/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub subtype: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub id: u64,
    #[serde(rename = "type")]
    pub account_type: String,
    pub state: String,
    pub list: Vec<CurrencyBalance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyBalance {
    pub currency: String,
    #[serde(rename = "type")]
    pub balance_type: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
}

/// `GET /v2/market-status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    /// 1 normal, 2 halted, 3 cancel-only
    pub market_status: i32,
    #[serde(default)]
    pub halt_start_time: Option<i64>,
    #[serde(default)]
    pub halt_end_time: Option<i64>,
    #[serde(default)]
    pub halt_reason: Option<i32>,
    #[serde(default)]
    pub affected_symbols: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub id: i64,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: i64,
}

/// Aggregated 24h ticker with best bid/ask, `[price, size]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTicker {
    pub id: i64,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: i64,
    pub bid: [f64; 2],
    pub ask: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub amount: f64,
    pub vol: f64,
    pub count: i64,
    pub bid: f64,
    pub bid_size: f64,
    pub ask: f64,
    pub ask_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub ts: i64,
    pub version: i64,
    pub bids: Vec<[f64; 2]>,
    pub asks: Vec<[f64; 2]>,
}
