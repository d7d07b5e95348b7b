/*
[INPUT]:  API access key and secret key
[OUTPUT]: Validated credentials for request signing
[POS]:    Auth layer - key material holder
[UPDATE]: When credential sources or validation rules change
*/

use std::fmt;

use crate::error::{HuobiError, Result};

/// API key pair used to sign REST and WebSocket auth requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Both keys must be non-empty.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();
        if access_key.trim().is_empty() || secret_key.trim().is_empty() {
            return Err(HuobiError::Config(
                "access key or secret key can not be empty".to_string(),
            ));
        }
        Ok(Self {
            access_key,
            secret_key,
        })
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret")]
    #[case("access", "")]
    #[case("", "")]
    #[case("  ", "secret")]
    fn test_empty_keys_rejected(#[case] access: &str, #[case] secret: &str) {
        let err = Credentials::new(access, secret).unwrap_err();
        assert!(matches!(err, HuobiError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("access", "super-secret").unwrap();
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("access"));
        assert!(!rendered.contains("super-secret"));
    }
}
