/*
[INPUT]:  Raw inbound frames from a Connection
[OUTPUT]: Decoded JSON messages, keep-alive tokens, protocol errors, control frames
[POS]:    WebSocket layer - per-stream wire protocol (market gzip vs private plain JSON)
[UPDATE]: When the exchange changes framing, keep-alive or error shapes
*/

use std::io::Read;

use flate2::read::GzDecoder;
use serde_json::{Value, json};

use crate::error::{ExchangeError, HuobiError, Result};
use crate::ws::connection::Frame;

/// Wire protocol of one stream family.
pub trait MessageHandler: Send + Sync {
    /// Decode a frame into a JSON object.
    fn decode(&self, frame: &Frame) -> Result<Value>;

    /// Fail with [`HuobiError::Exchange`] if the message is an error frame.
    fn check_error(&self, message: &Value) -> Result<()>;

    /// Token of a server keep-alive probe, `None` for every other message.
    fn keepalive_token(&self, message: &Value) -> Result<Option<i64>>;

    /// Reply the server expects for a keep-alive probe carrying `token`.
    fn pong(&self, token: i64) -> Value;

    /// Topic a decoded message belongs to.
    fn topic_of<'a>(&self, message: &'a Value) -> Option<&'a str>;

    fn subscribe_frame(&self, topic: &str) -> Value;

    fn unsubscribe_frame(&self, topic: &str) -> Value;

    fn is_keepalive(&self, frame: &Frame) -> Result<Option<i64>> {
        self.keepalive_token(&self.decode(frame)?)
    }

    /// Decode and error-check in one step.
    fn handle(&self, frame: &Frame) -> Result<Value> {
        let message = self.decode(frame)?;
        self.check_error(&message)?;
        Ok(message)
    }
}

/// Public market stream: gzip-compressed JSON, `{"ping": n}` keep-alives.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketHandler;

/// Private account/order stream: plain JSON, action-tagged frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateHandler;

impl MessageHandler for MarketHandler {
    fn decode(&self, frame: &Frame) -> Result<Value> {
        match frame {
            Frame::Binary(bytes) => {
                let mut text = String::new();
                GzDecoder::new(bytes.as_slice())
                    .read_to_string(&mut text)
                    .map_err(HuobiError::Gzip)?;
                parse_object(&text)
            }
            // Only seen from proxies that inflate on the way through.
            Frame::Text(text) => parse_object(text),
            Frame::Close => Err(HuobiError::InvalidResponse(
                "cannot decode a closing frame".to_string(),
            )),
        }
    }

    fn check_error(&self, message: &Value) -> Result<()> {
        if message.get("status").and_then(Value::as_str) != Some("error") {
            return Ok(());
        }
        let code = required_text(message, "err-code")?;
        let text = required_text(message, "err-msg")?;
        Err(ExchangeError::new(code, text).into())
    }

    fn keepalive_token(&self, message: &Value) -> Result<Option<i64>> {
        match message.get("ping") {
            None => Ok(None),
            Some(token) => token.as_i64().map(Some).ok_or_else(|| {
                HuobiError::InvalidResponse(format!("non-integer ping token in {message}"))
            }),
        }
    }

    fn pong(&self, token: i64) -> Value {
        json!({ "pong": token })
    }

    fn topic_of<'a>(&self, message: &'a Value) -> Option<&'a str> {
        ["ch", "subbed", "unsubbed"]
            .iter()
            .find_map(|key| message.get(*key).and_then(Value::as_str))
    }

    fn subscribe_frame(&self, topic: &str) -> Value {
        json!({ "sub": topic })
    }

    fn unsubscribe_frame(&self, topic: &str) -> Value {
        json!({ "unsub": topic })
    }
}

impl MessageHandler for PrivateHandler {
    fn decode(&self, frame: &Frame) -> Result<Value> {
        match frame {
            Frame::Text(text) => parse_object(text),
            Frame::Binary(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| HuobiError::InvalidResponse(format!("non-utf8 frame: {e}")))?;
                parse_object(text)
            }
            Frame::Close => Err(HuobiError::InvalidResponse(
                "cannot decode a closing frame".to_string(),
            )),
        }
    }

    fn check_error(&self, message: &Value) -> Result<()> {
        let Some(code) = message.get("code") else {
            return Ok(());
        };
        let code = code.as_i64().ok_or_else(|| {
            HuobiError::InvalidResponse(format!("non-integer code in {message}"))
        })?;
        if code == 200 {
            return Ok(());
        }
        let text = required_text(message, "message")?;
        Err(ExchangeError::new(code.to_string(), text).into())
    }

    fn keepalive_token(&self, message: &Value) -> Result<Option<i64>> {
        if message.get("action").and_then(Value::as_str) != Some("ping") {
            return Ok(None);
        }
        message
            .pointer("/data/ts")
            .and_then(Value::as_i64)
            .map(Some)
            .ok_or_else(|| HuobiError::InvalidResponse(format!("ping without data.ts: {message}")))
    }

    fn pong(&self, token: i64) -> Value {
        json!({ "action": "pong", "data": { "ts": token } })
    }

    fn topic_of<'a>(&self, message: &'a Value) -> Option<&'a str> {
        message.get("ch").and_then(Value::as_str)
    }

    fn subscribe_frame(&self, topic: &str) -> Value {
        json!({ "action": "sub", "ch": topic })
    }

    fn unsubscribe_frame(&self, topic: &str) -> Value {
        json!({ "action": "unsub", "ch": topic })
    }
}

fn parse_object(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(HuobiError::InvalidResponse(format!(
            "expected a JSON object, got {value}"
        )));
    }
    Ok(value)
}

/// String field, numeric values rendered as text.
fn required_text(message: &Value, key: &str) -> Result<String> {
    match message.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        _ => Err(HuobiError::InvalidResponse(format!(
            "error frame without {key}: {message}"
        ))),
    }
}
