/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response envelopes with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;

/// REST envelope: v1 endpoints report `status`, v2 endpoints report a numeric `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "err-code", default)]
    pub err_code: Option<String>,
    #[serde(rename = "err-msg", default)]
    pub err_msg: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Market endpoints (`/market/depth`, `/market/detail/merged`) put the payload here.
    #[serde(default = "Option::default")]
    pub tick: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Exchange error carried by the envelope, if any.
    pub fn error(&self) -> Option<ExchangeError> {
        if self.status.as_deref() == Some("error") {
            return Some(ExchangeError::new(
                self.err_code.clone().unwrap_or_default(),
                self.err_msg.clone().unwrap_or_default(),
            ));
        }
        match self.code {
            Some(code) if code != 200 => Some(ExchangeError::new(
                code.to_string(),
                self.message.clone().unwrap_or_default(),
            )),
            _ => None,
        }
    }

    /// Payload from `data`, falling back to `tick`.
    pub fn into_payload(self) -> Option<T> {
        self.data.or(self.tick)
    }
}
