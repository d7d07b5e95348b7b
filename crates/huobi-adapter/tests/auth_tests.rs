/*
[INPUT]:  Fixed signing inputs with precomputed digests
[OUTPUT]: Test results for request signing and credentials
[POS]:    Integration tests - authentication
[UPDATE]: When the signing protocol or request shapes change
*/

mod common;

use std::collections::BTreeMap;

use common::{ACCESS_KEY, SECRET_KEY, test_credentials};
use huobi_adapter::{AuthScheme, Credentials, HuobiError, SignatureEngine, SignedRequest};
use reqwest::Method;
use rstest::rstest;
use tokio_test::assert_ok;

const TIMESTAMP: &str = "2023-01-01T00:01:01";

#[test]
fn test_rest_request_signature_vector() {
    let credentials = test_credentials();
    let mut request = SignedRequest::rest(&credentials)
        .with_timestamp(TIMESTAMP)
        .param("param", "param");

    let signature = assert_ok!(request.sign(&Method::GET, "https://example.com/path", &credentials))
        .to_string();
    assert_eq!(signature, "9tSEX3VE0hDdOfNzSXwd09Qnggf8dSJZcSqlViCfU/0=");

    let pairs = request.to_pairs();
    assert!(pairs.contains(&("AccessKeyId".to_string(), ACCESS_KEY.to_string())));
    assert!(pairs.contains(&("Signature".to_string(), signature)));
}

#[test]
fn test_websocket_request_signature_vector() {
    let credentials = test_credentials();
    let mut request = SignedRequest::websocket(&credentials).with_timestamp(TIMESTAMP);
    assert_eq!(request.scheme(), AuthScheme::WebSocket);

    let signature = assert_ok!(request.sign(&Method::GET, "wss://api.huobi.pro/ws/v2", &credentials))
        .to_string();
    assert_eq!(signature, "qhZmVDlo3P0vyagDJ9DznHGIFPmdIPfnQhdGMCstScw=");

    let json = request.to_json();
    assert_eq!(json["authType"], "api");
    assert_eq!(json["signatureVersion"], "2.1");
    assert!(!request.signed_params().contains_key("authType"));
}

#[test]
fn test_signature_never_covers_itself() {
    let credentials = test_credentials();
    let mut request = SignedRequest::rest(&credentials).with_timestamp(TIMESTAMP);
    let first = request
        .sign(&Method::GET, "https://example.com/path", &credentials)
        .unwrap()
        .to_string();

    // re-signing with the signature present yields the same value
    let second = request
        .sign(&Method::GET, "https://example.com/path", &credentials)
        .unwrap()
        .to_string();
    assert_eq!(first, second);
    assert!(!request.signed_params().contains_key("Signature"));
}

#[rstest]
#[case("param", "other")]
#[case("Timestamp", "2023-01-01T00:01:02")]
#[case("extra", "1")]
fn test_any_param_change_changes_signature(#[case] key: &str, #[case] value: &str) {
    let mut params = BTreeMap::from([
        ("AccessKeyId".to_string(), ACCESS_KEY.to_string()),
        ("SignatureMethod".to_string(), "HmacSHA256".to_string()),
        ("SignatureVersion".to_string(), "2".to_string()),
        ("Timestamp".to_string(), TIMESTAMP.to_string()),
        ("param".to_string(), "param".to_string()),
    ]);
    let url = "https://example.com/path";
    let base = SignatureEngine::sign(&Method::GET, url, &params, SECRET_KEY).unwrap();

    params.insert(key.to_string(), value.to_string());
    let changed = SignatureEngine::sign(&Method::GET, url, &params, SECRET_KEY).unwrap();
    assert_ne!(base, changed);
}

#[test]
fn test_hostless_url_fails_fast() {
    let credentials = test_credentials();
    let mut request = SignedRequest::websocket(&credentials);
    let err = request
        .sign(&Method::GET, "file:///tmp/socket", &credentials)
        .unwrap_err();
    assert!(matches!(err, HuobiError::Config(_)));
    assert!(request.signature().is_none());
}

#[rstest]
#[case("", SECRET_KEY)]
#[case(ACCESS_KEY, "")]
#[case("  ", SECRET_KEY)]
fn test_missing_credentials_rejected(#[case] access: &str, #[case] secret: &str) {
    let err = Credentials::new(access, secret).unwrap_err();
    assert!(matches!(err, HuobiError::Config(_)));
}

#[test]
fn test_credentials_debug_redacts_secret() {
    let rendered = format!("{:?}", test_credentials());
    assert!(rendered.contains(ACCESS_KEY));
    assert!(!rendered.contains(SECRET_KEY));
}
