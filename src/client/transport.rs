//! HTTP transport used by the [`Client`](super::Client).
//!
//! The client never talks to `reqwest` directly. It builds an [`ApiRequest`]
//! and hands it to a [`Transport`], which returns the raw response body on
//! success. This keeps the request plumbing replaceable in tests.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
pub use reqwest::Method;
use tracing::{debug, instrument};

use crate::error::TransportError;

/// A single request against the DT REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// The HTTP method.
    pub method: Method,
    /// The fully-qualified URL.
    pub url: String,
    /// An optional JSON body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request without a body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Executes [`ApiRequest`]s and returns the response body.
///
/// Implementations map non-success statuses to [`TransportError::Status`].
/// Retries, if any, belong here and not in the client.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send the request and return the body of a successful response.
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError>;
}

/// Service account credentials sent as HTTP basic auth.
#[derive(Clone)]
pub struct Credentials {
    /// The service account key ID.
    pub key_id: String,
    /// The service account key secret.
    pub key_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    credentials: Credentials,
}

impl HttpTransport {
    /// Build a transport that authenticates every request with `credentials`.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            credentials,
        })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    #[instrument(
        name = "HttpTransport::execute",
        skip(self, request),
        fields(method = %request.method, url = %request.url),
    )]
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .basic_auth(&self.credentials.key_id, Some(&self.credentials.key_secret));

        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_builder() {
        let request = ApiRequest::new(Method::POST, "https://example.com/v2/x")
            .with_body(b"{}".to_vec());
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://example.com/v2/x");
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials {
            key_id: "key".to_string(),
            key_secret: "hunter2".to_string(),
        };
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("key"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_http_transport_builds() {
        let transport = HttpTransport::new(
            Credentials {
                key_id: "key".to_string(),
                key_secret: "secret".to_string(),
            },
            Duration::from_secs(5),
        );
        assert!(transport.is_ok());
    }
}
