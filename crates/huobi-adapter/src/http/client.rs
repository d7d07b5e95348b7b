/*
[INPUT]:  HTTP configuration (base URL, timeouts, credentials)
[OUTPUT]: Configured reqwest client, signed requests, unwrapped response envelopes
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{Credentials, SignedRequest};
use crate::config::DEFAULT_REST_URL;
use crate::error::{HuobiError, Result};
use crate::types::ApiResponse;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// REST client for the Huobi spot API
#[derive(Debug)]
pub struct HuobiClient {
    http_client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl HuobiClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_REST_URL)
    }

    /// Create a client against a custom host (AWS mirror, test server)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            credentials: None,
        })
    }

    /// Set credentials for signed requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint)?)
    }

    /// Unsigned request; `query` is appended as-is.
    pub(crate) fn public_request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url).query(query))
    }

    /// Request whose query carries the REST signature fields plus `params`.
    pub(crate) fn signed_request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<RequestBuilder> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            HuobiError::Config("credentials are required for signed requests".to_string())
        })?;
        let url = self.url(endpoint)?;

        let mut request = SignedRequest::rest(credentials);
        for (key, value) in params {
            request.insert(*key, value);
        }
        request.sign(&method, url.as_str(), credentials)?;

        Ok(self
            .http_client
            .request(method, url)
            .query(&request.to_pairs()))
    }

    pub(crate) async fn signed_get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let builder = self.signed_request(Method::GET, endpoint, params)?;
        self.send_json(builder).await
    }

    /// Signed POST; only the signature fields go in the query, `body` is sent as JSON.
    pub(crate) async fn signed_post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.signed_request(Method::POST, endpoint, &[])?.json(body);
        self.send_json(builder).await
    }

    /// Send, check the exchange envelope and return its `data`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "rest response received");

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|err| {
            if status.is_success() {
                HuobiError::Serialization(err)
            } else {
                HuobiError::InvalidResponse(format!("HTTP {status}: {body}"))
            }
        })?;
        if let Some(err) = envelope.error() {
            return Err(err.into());
        }
        envelope
            .into_payload()
            .ok_or_else(|| HuobiError::InvalidResponse(format!("response without data: {body}")))
    }
}
