/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderSource, OrderType, StopOperator};

/// Body of `POST /v1/order/orders/place`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NewOrderRequest {
    pub account_id: u64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub source: OrderSource,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub self_match_prevent: u8,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operator: Option<StopOperator>,
}

impl NewOrderRequest {
    /// Limit order with default source and no stop trigger.
    pub fn limit(
        account_id: u64,
        symbol: impl Into<String>,
        order_type: OrderType,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            account_id,
            symbol: symbol.into(),
            order_type,
            amount,
            price: Some(price),
            source: OrderSource::default(),
            client_order_id: None,
            self_match_prevent: 0,
            stop_price: None,
            operator: None,
        }
    }
}

/// Body of `POST /v1/order/orders/{order-id}/submitcancel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CancelOrderRequest {
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub symbol: Option<String>,
}
