/*
[INPUT]:  Order requests and API key credentials
[OUTPUT]: Exchange order ids
[POS]:    HTTP layer - trading endpoints (signed POST, JSON body)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use serde_json::json;

use crate::error::Result;
use crate::http::HuobiClient;
use crate::types::{CancelOrderRequest, NewOrderRequest};
use crate::ws::topic::validate_symbol;

impl HuobiClient {
    /// Place a new order, returns the exchange order id
    ///
    /// POST /v1/order/orders/place
    pub async fn place_order(&self, req: &NewOrderRequest) -> Result<String> {
        validate_symbol(&req.symbol)?;
        self.signed_post("/v1/order/orders/place", req).await
    }

    /// Cancel an order, returns the order id echoed back
    ///
    /// POST /v1/order/orders/{order-id}/submitcancel
    pub async fn cancel_order(&self, req: &CancelOrderRequest) -> Result<String> {
        let endpoint = format!("/v1/order/orders/{}/submitcancel", req.order_id);
        let body = match &req.symbol {
            Some(symbol) => json!({ "symbol": validate_symbol(symbol)? }),
            None => json!({}),
        };
        self.signed_post(&endpoint, &body).await
    }
}
