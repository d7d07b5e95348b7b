/*
[INPUT]:  Symbol identifier (e.g., "btcusdt"), HUOBI_* endpoint overrides
[OUTPUT]: Candlestick and best bid/offer updates printed to stdout
[POS]:    Examples - public market stream iteration
[UPDATE]: When market stream builders change
*/

use futures_util::StreamExt;
use huobi_adapter::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Example: iterate a public market stream
///
/// Subscribes to one-minute candles and best bid/offer for a symbol and prints the first
/// few messages. No credentials are needed.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let endpoints = Endpoints::from_env();
    let symbol = std::env::args().nth(1).unwrap_or_else(|| "btcusdt".to_string());
    let mut ws = MarketWebSocket::new(&endpoints.market_ws_url);

    ws.candlestick(&symbol, CandleInterval::Min1)?
        .random_id()
        .sub(None)
        .await?;
    ws.best_bid_offer(&symbol)?.sub(None).await?;
    info!(topics = ?ws.topics(), "subscribed");

    {
        let mut messages = Box::pin(ws.messages().take(10));
        while let Some(item) = messages.next().await {
            match item {
                Ok(message) => println!("{message}"),
                Err(err) => warn!(error = %err, "stream error"),
            }
        }
    }

    ws.unsubscribe_all().await?;
    ws.close().await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
