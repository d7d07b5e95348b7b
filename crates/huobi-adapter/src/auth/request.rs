/*
[INPUT]:  Credentials, endpoint parameters, HTTP method and target URL
[OUTPUT]: Signed parameter sets for REST queries and WebSocket auth frames
[POS]:    Auth layer - request shapes built on the signature engine
[UPDATE]: When the exchange changes auth field names or versions
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{Map, Value};

use super::credentials::Credentials;
use super::signature::SignatureEngine;
use crate::error::Result;

pub const SIGNATURE_METHOD: &str = "HmacSHA256";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Field naming convention of a signed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Query-string auth for REST endpoints (`AccessKeyId`, `Signature`, ...).
    Rest,
    /// `params` object of the private WebSocket auth frame (`accessKey`, `signature`, ...).
    WebSocket,
}

struct FieldNames {
    access_key: &'static str,
    signature_method: &'static str,
    signature_version: &'static str,
    timestamp: &'static str,
    signature: &'static str,
    version: &'static str,
}

impl AuthScheme {
    fn fields(self) -> FieldNames {
        match self {
            AuthScheme::Rest => FieldNames {
                access_key: "AccessKeyId",
                signature_method: "SignatureMethod",
                signature_version: "SignatureVersion",
                timestamp: "Timestamp",
                signature: "Signature",
                version: "2",
            },
            AuthScheme::WebSocket => FieldNames {
                access_key: "accessKey",
                signature_method: "signatureMethod",
                signature_version: "signatureVersion",
                timestamp: "timestamp",
                signature: "signature",
                version: "2.1",
            },
        }
    }

    /// Name of the field carrying the signature.
    pub fn signature_field(self) -> &'static str {
        self.fields().signature
    }
}

/// UTC timestamp in the `YYYY-MM-DDTHH:MM:SS` form the exchange signs.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// A parameter set carrying identity, timestamp and signature fields.
///
/// The signature covers every parameter except the signature itself and the unsigned
/// extras (the WebSocket `authType` tag). Any mutation clears a previously computed
/// signature, so a stale signature is never transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    scheme: AuthScheme,
    params: BTreeMap<String, String>,
    unsigned: BTreeMap<String, String>,
    signature: Option<String>,
}

impl SignedRequest {
    pub fn new(scheme: AuthScheme, credentials: &Credentials) -> Self {
        let fields = scheme.fields();
        let mut params = BTreeMap::new();
        params.insert(
            fields.access_key.to_string(),
            credentials.access_key().to_string(),
        );
        params.insert(
            fields.signature_method.to_string(),
            SIGNATURE_METHOD.to_string(),
        );
        params.insert(
            fields.signature_version.to_string(),
            fields.version.to_string(),
        );
        params.insert(fields.timestamp.to_string(), format_timestamp(Utc::now()));

        let mut unsigned = BTreeMap::new();
        if scheme == AuthScheme::WebSocket {
            unsigned.insert("authType".to_string(), "api".to_string());
        }

        Self {
            scheme,
            params,
            unsigned,
            signature: None,
        }
    }

    pub fn rest(credentials: &Credentials) -> Self {
        Self::new(AuthScheme::Rest, credentials)
    }

    pub fn websocket(credentials: &Credentials) -> Self {
        Self::new(AuthScheme::WebSocket, credentials)
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// Replace the timestamp taken at construction.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        let key = self.scheme.fields().timestamp;
        self.params.insert(key.to_string(), timestamp.into());
        self.signature = None;
        self
    }

    /// Add an endpoint parameter to the signed set.
    ///
    /// The signature field name is reserved and ignored here.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Add the parameter only when present; absent values are never signed.
    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        if key == self.scheme.signature_field() || self.unsigned.contains_key(&key) {
            return;
        }
        self.params.insert(key, value.to_string());
        self.signature = None;
    }

    /// Parameters covered by the signature, in canonical order.
    pub fn signed_params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Compute and store the signature for a request to `url`.
    pub fn sign(&mut self, method: &Method, url: &str, credentials: &Credentials) -> Result<&str> {
        let signature =
            SignatureEngine::sign(method, url, &self.params, credentials.secret_key())?;
        Ok(self.signature.insert(signature).as_str())
    }

    /// Every transmitted field (signed, unsigned and signature) as key/value pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .params
            .iter()
            .chain(self.unsigned.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(signature) = &self.signature {
            pairs.push((self.scheme.signature_field().to_string(), signature.clone()));
        }
        pairs
    }

    /// Every transmitted field as a JSON object.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .to_pairs()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TIMESTAMP: &str = "2023-01-01T00:01:01";

    fn credentials() -> Credentials {
        Credentials::new("test-access-key", "test-secret-key").unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 1, 1).unwrap();
        assert_eq!(format_timestamp(at), TIMESTAMP);
    }

    #[test]
    fn test_rest_signed_params() {
        let request = SignedRequest::rest(&credentials())
            .with_timestamp(TIMESTAMP)
            .param("param", "param");

        let keys: Vec<&str> = request.signed_params().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "AccessKeyId",
                "SignatureMethod",
                "SignatureVersion",
                "Timestamp",
                "param"
            ]
        );
        assert_eq!(request.signed_params()["SignatureVersion"], "2");
    }

    #[test]
    fn test_rest_sign_vector() {
        let creds = credentials();
        let mut request = SignedRequest::rest(&creds)
            .with_timestamp(TIMESTAMP)
            .param("param", "param");
        let signature = request
            .sign(&Method::GET, "https://example.com/path", &creds)
            .unwrap()
            .to_string();

        assert_eq!(signature, "9tSEX3VE0hDdOfNzSXwd09Qnggf8dSJZcSqlViCfU/0=");
        assert!(!request.signed_params().contains_key("Signature"));
        assert!(
            request
                .to_pairs()
                .contains(&("Signature".to_string(), signature.clone()))
        );
    }

    #[test]
    fn test_rest_post_with_extra_params() {
        let creds = credentials();
        let mut request = SignedRequest::rest(&creds)
            .with_timestamp(TIMESTAMP)
            .param("param", "param")
            .param("account-id", 100009)
            .param("note", "a b/c")
            .param_opt("absent", None::<String>);
        let signature = request
            .sign(&Method::POST, "https://example.com/v1/order", &creds)
            .unwrap();

        assert_eq!(signature, "XwzzmGyA+1uAfBviNJ/bbAPTDP2P+urQf2Kzov706UQ=");
    }

    #[test]
    fn test_websocket_shape() {
        let creds = credentials();
        let mut request = SignedRequest::websocket(&creds).with_timestamp(TIMESTAMP);
        request
            .sign(&Method::GET, "wss://api.huobi.pro/ws/v2", &creds)
            .unwrap();

        assert!(!request.signed_params().contains_key("authType"));
        assert_eq!(
            request.to_json(),
            serde_json::json!({
                "accessKey": "test-access-key",
                "authType": "api",
                "signatureMethod": "HmacSHA256",
                "signatureVersion": "2.1",
                "timestamp": TIMESTAMP,
                "signature": "qhZmVDlo3P0vyagDJ9DznHGIFPmdIPfnQhdGMCstScw=",
            })
        );
    }

    #[test]
    fn test_signature_field_is_never_signed() {
        let creds = credentials();
        let mut request = SignedRequest::rest(&creds)
            .with_timestamp(TIMESTAMP)
            .param("param", "param")
            .param("Signature", "forged");
        assert!(!request.signed_params().contains_key("Signature"));

        let signature = request
            .sign(&Method::GET, "https://example.com/path", &creds)
            .unwrap();
        assert_eq!(signature, "9tSEX3VE0hDdOfNzSXwd09Qnggf8dSJZcSqlViCfU/0=");
    }

    #[test]
    fn test_mutation_clears_signature() {
        let creds = credentials();
        let mut request = SignedRequest::rest(&creds).with_timestamp(TIMESTAMP);
        request
            .sign(&Method::GET, "https://example.com/path", &creds)
            .unwrap();
        assert!(request.signature().is_some());

        request.insert("symbol", "btcusdt");
        assert!(request.signature().is_none());
    }

    #[test]
    fn test_sign_without_host_fails() {
        let creds = credentials();
        let mut request = SignedRequest::rest(&creds);
        let err = request
            .sign(&Method::GET, "unix:/tmp/socket", &creds)
            .unwrap_err();
        assert!(matches!(err, crate::error::HuobiError::Config(_)));
        assert!(request.signature().is_none());
    }
}
