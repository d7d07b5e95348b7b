/*
[INPUT]:  Symbol and stream parameters
[OUTPUT]: Canonical topic strings
[POS]:    WebSocket layer - topic grammar for market and private streams
[UPDATE]: When the exchange adds streams or changes topic grammar
*/

use crate::error::{HuobiError, Result};
use crate::types::{CandleInterval, DepthLevel, PriceLevel, TradeDetailMode};

/// Reject symbols that would make the topic ambiguous.
pub fn validate_symbol(symbol: &str) -> Result<&str> {
    if symbol.is_empty() {
        return Err(HuobiError::InvalidParameter("symbol must not be empty".to_string()));
    }
    if symbol
        .chars()
        .any(|c| c.is_whitespace() || c == '.' || c == '#')
    {
        return Err(HuobiError::InvalidParameter(format!(
            "symbol {symbol:?} contains a reserved character"
        )));
    }
    Ok(symbol)
}

impl AsRef<str> for CandleInterval {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

pub fn candlestick(symbol: &str, interval: impl AsRef<str>) -> Result<String> {
    let interval = interval.as_ref();
    if interval.is_empty() {
        return Err(HuobiError::InvalidParameter(
            "candle interval must not be empty".to_string(),
        ));
    }
    Ok(format!("market.{}.kline.{interval}", validate_symbol(symbol)?))
}

pub fn ticker(symbol: &str) -> Result<String> {
    Ok(format!("market.{}.ticker", validate_symbol(symbol)?))
}

pub fn orderbook(symbol: &str, level: DepthLevel) -> Result<String> {
    Ok(format!("market.{}.depth.{level}", validate_symbol(symbol)?))
}

pub fn best_bid_offer(symbol: &str) -> Result<String> {
    Ok(format!("market.{}.bbo", validate_symbol(symbol)?))
}

pub fn trade_detail(symbol: &str) -> Result<String> {
    Ok(format!("market.{}.trade.detail", validate_symbol(symbol)?))
}

pub fn market_detail(symbol: &str) -> Result<String> {
    Ok(format!("market.{}.detail", validate_symbol(symbol)?))
}

pub fn etp(symbol: &str) -> Result<String> {
    Ok(format!("market.{}.etp", validate_symbol(symbol)?))
}

pub fn mbp_refresh(symbol: &str, level: PriceLevel) -> Result<String> {
    Ok(format!(
        "market.{}.mbp.refresh.{}",
        validate_symbol(symbol)?,
        level.value()
    ))
}

pub fn order_updates(symbol: &str) -> Result<String> {
    Ok(format!("orders#{}", validate_symbol(symbol)?))
}

pub fn trade_clearing(symbol: &str, mode: TradeDetailMode) -> Result<String> {
    Ok(format!(
        "trade.clearing#{}#{}",
        validate_symbol(symbol)?,
        mode.value()
    ))
}

/// `mode` 0: available balance changes, 1: available and total, 2: both with account state.
pub fn account_change(mode: u8) -> Result<String> {
    if mode > 2 {
        return Err(HuobiError::InvalidParameter(format!(
            "account change mode must be 0, 1 or 2, got {mode}"
        )));
    }
    Ok(format!("accounts.update#{mode}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_market_topics() {
        assert_eq!(
            candlestick("btcusdt", "1min").unwrap(),
            "market.btcusdt.kline.1min"
        );
        assert_eq!(
            candlestick("btcusdt", CandleInterval::Min1).unwrap(),
            candlestick("btcusdt", "1min").unwrap()
        );
        assert_eq!(
            orderbook("btcusdt", DepthLevel::Step0).unwrap(),
            "market.btcusdt.depth.step0"
        );
        assert_eq!(ticker("btcusdt").unwrap(), "market.btcusdt.ticker");
        assert_eq!(best_bid_offer("btcusdt").unwrap(), "market.btcusdt.bbo");
        assert_eq!(
            trade_detail("btcusdt").unwrap(),
            "market.btcusdt.trade.detail"
        );
        assert_eq!(market_detail("btcusdt").unwrap(), "market.btcusdt.detail");
        assert_eq!(etp("btc3lusdt").unwrap(), "market.btc3lusdt.etp");
        assert_eq!(
            mbp_refresh("btcusdt", PriceLevel::Level20).unwrap(),
            "market.btcusdt.mbp.refresh.20"
        );
    }

    #[test]
    fn test_private_topics() {
        assert_eq!(order_updates("btcusdt").unwrap(), "orders#btcusdt");
        assert_eq!(order_updates("*").unwrap(), "orders#*");
        assert_eq!(
            trade_clearing("btcusdt", TradeDetailMode::TradeAndCancellationEvents).unwrap(),
            "trade.clearing#btcusdt#1"
        );
        assert_eq!(account_change(2).unwrap(), "accounts.update#2");
    }

    #[rstest]
    #[case("")]
    #[case("btc usdt")]
    #[case("btc.usdt")]
    #[case("btc#usdt")]
    fn test_bad_symbols_rejected(#[case] symbol: &str) {
        let err = ticker(symbol).unwrap_err();
        assert!(matches!(err, HuobiError::InvalidParameter(_)));
    }

    #[test]
    fn test_account_change_mode_range() {
        assert!(matches!(
            account_change(3).unwrap_err(),
            HuobiError::InvalidParameter(_)
        ));
        assert!(matches!(
            candlestick("btcusdt", "").unwrap_err(),
            HuobiError::InvalidParameter(_)
        ));
    }
}
