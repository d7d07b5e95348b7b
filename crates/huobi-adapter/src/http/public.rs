/*
[INPUT]:  Symbol identifiers and query parameters
[OUTPUT]: Market data (server time, market status, candles, tickers, depth)
[POS]:    HTTP layer - public market data endpoints (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use reqwest::Method;

use crate::error::{HuobiError, Result};
use crate::http::HuobiClient;
use crate::types::{
    Candle, CandleInterval, DepthLevel, DepthSnapshot, MarketDepth, MarketStatus, MergedTicker,
    Ticker,
};
use crate::ws::topic::validate_symbol;

const MAX_CANDLE_SIZE: u32 = 2000;

impl HuobiClient {
    /// Server time in milliseconds
    ///
    /// GET /v1/common/timestamp
    pub async fn get_timestamp(&self) -> Result<i64> {
        let builder = self.public_request(Method::GET, "/v1/common/timestamp", &[])?;
        self.send_json(builder).await
    }

    /// GET /v2/market-status
    pub async fn get_market_status(&self) -> Result<MarketStatus> {
        let builder = self.public_request(Method::GET, "/v2/market-status", &[])?;
        self.send_json(builder).await
    }

    /// Candlestick history, newest first
    ///
    /// GET /market/history/kline?symbol={symbol}&period={period}&size={size}
    pub async fn get_candles(
        &self,
        symbol: &str,
        period: CandleInterval,
        size: Option<u32>,
    ) -> Result<Vec<Candle>> {
        let mut query = vec![
            ("symbol", validate_symbol(symbol)?.to_string()),
            ("period", period.as_str().to_string()),
        ];
        if let Some(size) = size {
            if !(1..=MAX_CANDLE_SIZE).contains(&size) {
                return Err(HuobiError::InvalidParameter(format!(
                    "candle size must be within 1..={MAX_CANDLE_SIZE}, got {size}"
                )));
            }
            query.push(("size", size.to_string()));
        }
        let builder = self.public_request(Method::GET, "/market/history/kline", &query)?;
        self.send_json(builder).await
    }

    /// GET /market/detail/merged?symbol={symbol}
    pub async fn get_merged_ticker(&self, symbol: &str) -> Result<MergedTicker> {
        let query = [("symbol", validate_symbol(symbol)?.to_string())];
        let builder = self.public_request(Method::GET, "/market/detail/merged", &query)?;
        self.send_json(builder).await
    }

    /// GET /market/tickers
    pub async fn get_tickers(&self) -> Result<Vec<Ticker>> {
        let builder = self.public_request(Method::GET, "/market/tickers", &[])?;
        self.send_json(builder).await
    }

    /// Order book snapshot
    ///
    /// GET /market/depth?symbol={symbol}&depth={depth}&type={step}
    pub async fn get_market_depth(
        &self,
        symbol: &str,
        depth: MarketDepth,
        step: DepthLevel,
    ) -> Result<DepthSnapshot> {
        let query = [
            ("symbol", validate_symbol(symbol)?.to_string()),
            ("depth", depth.value().to_string()),
            ("type", step.as_str().to_string()),
        ];
        let builder = self.public_request(Method::GET, "/market/depth", &query)?;
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::HuobiError;
    use crate::http::{ClientConfig, HuobiClient};
    use crate::types::{CandleInterval, DepthLevel, MarketDepth};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HuobiClient {
        HuobiClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    fn json_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_raw(body.to_string(), "application/json")
    }

    #[tokio::test]
    async fn test_get_timestamp() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/v1/common/timestamp"))
            .respond_with(json_response(r#"{"status":"ok","data":1629715504949}"#))
            .expect(1)
            .mount(&server)
            .await;

        let ts = client(&server).get_timestamp().await.expect("get_timestamp failed");
        assert_eq!(ts, 1_629_715_504_949);
    }

    #[tokio::test]
    async fn test_get_market_status() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/v2/market-status"))
            .respond_with(json_response(
                r#"{"code":200,"message":"success","data":{"marketStatus":1}}"#,
            ))
            .mount(&server)
            .await;

        let status = client(&server).get_market_status().await.unwrap();
        assert_eq!(status.market_status, 1);
        assert!(status.halt_reason.is_none());
    }

    #[tokio::test]
    async fn test_get_candles() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/market/history/kline"))
            .and(query_param("symbol", "btcusdt"))
            .and(query_param("period", "1day"))
            .and(query_param("size", "1"))
            .respond_with(json_response(
                r#"{"ch":"market.btcusdt.kline.1day","status":"ok","ts":1629769247172,
                    "data":[{"id":1629734400,"open":49056.37,"close":49025.51,"low":48838.3,
                    "high":49184.4,"amount":1.0,"vol":49000.0,"count":25}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let candles = client(&server)
            .get_candles("btcusdt", CandleInterval::Day1, Some(1))
            .await
            .expect("get_candles failed");
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].count, 25);
    }

    #[tokio::test]
    async fn test_get_candles_size_out_of_range() {
        let server = MockServer::start().await;
        let err = client(&server)
            .get_candles("btcusdt", CandleInterval::Min1, Some(2001))
            .await
            .unwrap_err();
        assert!(matches!(err, HuobiError::InvalidParameter(_)));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_get_merged_ticker_reads_tick() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/market/detail/merged"))
            .and(query_param("symbol", "btcusdt"))
            .respond_with(json_response(
                r#"{"ch":"market.btcusdt.detail.merged","status":"ok","ts":1,
                    "tick":{"id":272156789143,"open":50080.0,"close":49820.92,"low":48767.0,
                    "high":50500.0,"amount":12055.36,"vol":5.99e8,"count":420573,
                    "bid":[49819.48,2.58112],"ask":[49819.49,0.002411]}}"#,
            ))
            .mount(&server)
            .await;

        let ticker = client(&server).get_merged_ticker("btcusdt").await.unwrap();
        assert_eq!(ticker.bid, [49819.48, 2.58112]);
    }

    #[tokio::test]
    async fn test_get_tickers() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/market/tickers"))
            .respond_with(json_response(
                r#"{"status":"ok","ts":1,"data":[{"symbol":"btcusdt","open":1.0,"high":2.0,
                    "low":0.5,"close":1.5,"amount":10.0,"vol":15.0,"count":3,"bid":1.4,
                    "bidSize":0.1,"ask":1.6,"askSize":0.2}]}"#,
            ))
            .mount(&server)
            .await;

        let tickers = client(&server).get_tickers().await.unwrap();
        assert_eq!(tickers[0].symbol, "btcusdt");
    }

    #[tokio::test]
    async fn test_get_market_depth() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/market/depth"))
            .and(query_param("symbol", "btcusdt"))
            .and(query_param("depth", "5"))
            .and(query_param("type", "step0"))
            .respond_with(json_response(
                r#"{"ch":"market.btcusdt.depth.step0","status":"ok","ts":1,
                    "tick":{"ts":1,"version":100,"bids":[[1.0,2.0]],"asks":[[1.1,3.0]]}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let depth = client(&server)
            .get_market_depth("btcusdt", MarketDepth::Depth5, DepthLevel::Step0)
            .await
            .unwrap();
        assert_eq!(depth.version, 100);
        assert_eq!(depth.asks, vec![[1.1, 3.0]]);
    }
}
