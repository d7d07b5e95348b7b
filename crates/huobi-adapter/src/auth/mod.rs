/*
[INPUT]:  API key pair and request parameters
[OUTPUT]: Signed REST query parameters and WebSocket auth payloads
[POS]:    Auth layer - request signing shared by REST and WebSocket
[UPDATE]: When auth flow or signature methods change
*/

pub mod credentials;
pub mod request;
pub mod signature;

pub use credentials::Credentials;
pub use request::{AuthScheme, SignedRequest, format_timestamp};
pub use signature::{SignTarget, SignatureEngine, canonical_query, signature_payload};
