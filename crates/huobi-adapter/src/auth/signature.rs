/*
[INPUT]:  HTTP method, target URL, canonical parameters and secret key
[OUTPUT]: Base64-encoded HMAC-SHA256 request signatures
[POS]:    Auth layer - signature primitive shared by REST and WebSocket auth
[UPDATE]: When changing the canonical payload or digest algorithm
*/

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::Method;
use sha2::Sha256;
use url::Url;
use url::form_urlencoded;

use crate::error::{HuobiError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Host and path of a signing target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignTarget {
    pub host: String,
    pub path: String,
}

impl SignTarget {
    /// Parse the URL a request will be sent to.
    ///
    /// Fails with [`HuobiError::Config`] when the URL does not parse or has no host.
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| HuobiError::Config(format!("invalid signing url {url}: {e}")))?;
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| HuobiError::Config(format!("cannot determine host from url {url}")))?;
        Ok(Self {
            host: host.to_string(),
            path: parsed.path().to_string(),
        })
    }
}

/// Form-encode parameters in ascending key order.
///
/// Space becomes `+`, `~` stays literal and `*` is escaped, the same byte set the exchange
/// uses when it rebuilds the payload.
pub fn canonical_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~")
}

/// `METHOD\nHOST\nPATH\nQUERY`, no trailing newline.
pub fn signature_payload(method: &Method, target: &SignTarget, query: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method.as_str(),
        target.host,
        target.path,
        query
    )
}

/// Stateless HMAC-SHA256 signing engine
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureEngine;

impl SignatureEngine {
    /// HMAC-SHA256 of `payload` keyed by `secret_key`, base64 (standard alphabet).
    pub fn digest(secret_key: &str, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .map_err(|e| HuobiError::Config(format!("failed to create HMAC: {e}")))?;
        mac.update(payload.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Sign the canonical form of `params` for a request to `url`.
    ///
    /// `params` must already exclude the signature field and anything else that is
    /// transmitted but not signed.
    pub fn sign(
        method: &Method,
        url: &str,
        params: &BTreeMap<String, String>,
        secret_key: &str,
    ) -> Result<String> {
        let target = SignTarget::parse(url)?;
        let payload = signature_payload(method, &target, &canonical_query(params));
        Self::digest(secret_key, &payload)
    }
}
