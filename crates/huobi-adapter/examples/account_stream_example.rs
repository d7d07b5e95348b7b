/*
[INPUT]:  HUOBI_ACCESS_KEY / HUOBI_SECRET_KEY environment variables
[OUTPUT]: Order and balance updates dispatched to callbacks
[POS]:    Examples - private account stream with the callback run loop
[UPDATE]: When the auth handshake or private topics change
*/

use huobi_adapter::*;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Example: authenticate and dispatch private updates to callbacks
///
/// Order updates use a plain callback, balance changes an async one. Exchange error frames
/// go to the error callback and the loop keeps running.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let credentials = Credentials::new(
        std::env::var("HUOBI_ACCESS_KEY").unwrap_or_default(),
        std::env::var("HUOBI_SECRET_KEY").unwrap_or_default(),
    )?;
    let endpoints = Endpoints::from_env();
    let config = WsConfig {
        callback_mode: CallbackMode::Background,
        ..WsConfig::default()
    };
    let mut ws = AccountWebSocket::with_config(&endpoints.account_ws_url, credentials, config);

    ws.authorize().await?;
    info!("authorized");

    ws.subscribe_order_updates(
        "*",
        Some(Callback::sync(|message: Value| println!("order: {message}"))),
    )
    .await?;
    ws.subscribe_account_change(
        1,
        Some(Callback::from_async(|message: Value| async move {
            println!("balance: {message}");
        })),
    )
    .await?;

    let on_error = Callback::sync(|err: ExchangeError| {
        error!(code = %err.code, message = %err.message, "exchange error");
    });
    ws.run_with_callbacks(on_error).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
