//! HTTP transport abstraction and implementation

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

/// Transport-specific errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    /// Request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),

    /// Request exceeded the wall-clock timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Transport abstraction over the authenticated HTTP calls the channel makes.
///
/// Implementations attach `Authorization: Bearer <token>` to every call and
/// return the raw response bytes; all failures are structured so callers can
/// tell a transient network fault from a protocol problem.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request and return the response body
    async fn get(&self, url: &str, bearer: &str) -> Result<Bytes, TransportError>;

    /// Issue a POST request with a JSON body and return the response body
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<Bytes, TransportError>;
}

/// Transport backed by a [`reqwest::Client`] with a fixed timeout
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport whose every call is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn map_send_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, bearer: &str) -> Result<Bytes, TransportError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| {
                let err = self.map_send_error(e);
                warn!("GET {} failed: {}", url, err);
                err
            })?;

        response.bytes().await.map_err(|e| {
            let err = TransportError::Body(e.to_string());
            warn!("GET {} body read failed: {}", url, err);
            err
        })
    }

    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<Bytes, TransportError> {
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let err = self.map_send_error(e);
                warn!("POST {} failed: {}", url, err);
                err
            })?;

        response.bytes().await.map_err(|e| {
            let err = TransportError::Body(e.to_string());
            warn!("POST {} body read failed: {}", url, err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_construction() {
        let transport = HttpTransport::new(Duration::from_secs(60)).unwrap();
        assert_eq!(transport.timeout, Duration::from_secs(60));
    }
}
