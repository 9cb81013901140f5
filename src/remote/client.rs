//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - A crate-identifying User-Agent
//! - Uniform mapping of transport failures and non-success statuses
//!
//! Requests are sent once. There is no retry, backoff or timeout: a failed
//! call aborts the whole run.

use crate::error::RemoteError;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("depbump/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    host: String,
}

impl HttpClient {
    /// Create a new HTTP client for the named host
    pub fn new(host: impl Into<String>) -> Result<Self, RemoteError> {
        let host = host.into();
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| {
                RemoteError::network(&host, format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, host })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Send a request without inspecting the status
    pub async fn send_raw(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        request
            .send()
            .await
            .map_err(|e| RemoteError::network(&self.host, e.to_string()))
    }

    /// Send a request and fail on non-success statuses
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self.send_raw(request).await?;
        self.ensure_success(response).await
    }

    /// Turn a non-success response into an `Api` error carrying the body
    pub async fn ensure_success(&self, response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::api(&self.host, status.as_u16(), body))
    }

    /// Send a request and decode a JSON body
    pub async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            RemoteError::invalid_response(&self.host, format!("failed to parse JSON: {}", e))
        })
    }

    /// Read a response body as text
    pub async fn text(&self, response: Response) -> Result<String, RemoteError> {
        response.text().await.map_err(|e| {
            RemoteError::invalid_response(&self.host, format!("failed to get text response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new("Bitbucket").unwrap();
        assert_eq!(client.host, "Bitbucket");
    }

    #[test]
    fn test_default_user_agent() {
        assert!(DEFAULT_USER_AGENT.starts_with("depbump/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = HttpClient::new("nowhere").unwrap();
        let request = client.inner().get("http://127.0.0.1:9/unreachable");
        let err = client.send(request).await.unwrap_err();
        assert!(matches!(err, RemoteError::Network { ref host, .. } if host == "nowhere"));
    }
}
