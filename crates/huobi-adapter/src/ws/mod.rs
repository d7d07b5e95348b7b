/*
[INPUT]:  Transport connections, credentials and topic subscriptions
[OUTPUT]: Market and account WebSocket clients
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding new streams or changing connection logic
*/

pub mod account;
pub mod callback;
pub mod connection;
pub mod handler;
pub mod market;
pub mod message;
pub mod registry;
pub mod session;
pub mod topic;

pub use account::{AccountWebSocket, AuthState};
pub use callback::Callback;
pub use connection::{Connection, Frame, ScriptedConnection, WsConnection};
pub use handler::{MarketHandler, MessageHandler, PrivateHandler};
pub use market::{MarketStream, MarketWebSocket};
pub use message::{AccountPush, BboTick, CandleTick, DepthTick, MarketPush, OrderUpdate, parse_message};
pub use registry::SubscriptionRegistry;
pub use session::ConnectionState;
