//! Client for the Disruptive Technologies REST API.
//!
//! A [`Client`] owns its [`Transport`] and its [`RuleCache`]. Cloning the
//! client is cheap and clones share both, so every resource operation of a
//! configured provider resolves rules through the same cache.

pub mod contacts;
pub mod rules;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::cache::RuleCache;
use crate::error::{Error, Result};

pub use transport::{ApiRequest, Credentials, HttpTransport, Method, Transport};

/// Default base URL of the DT REST API.
pub const DEFAULT_API_URL: &str = "https://api.disruptive-technologies.com";

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API version used for contacts and contact groups.
pub(crate) const API_VERSION: &str = "v2";

/// API version used for notification rules.
pub(crate) const RULES_API_VERSION: &str = "v2alpha";

/// DT REST API client.
#[derive(Clone)]
pub struct Client {
    url: String,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    rules: Arc<RuleCache>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("cached_rules", &self.rules.len())
            .finish()
    }
}

impl Client {
    /// Create a client for `url` that sends requests through `transport`.
    pub fn new(url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            transport,
            rules: Arc::new(RuleCache::new()),
        }
    }

    /// Set the deadline applied to every remote call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The base URL without a trailing slash.
    pub fn url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// The rule cache owned by this client.
    pub fn rule_cache(&self) -> &RuleCache {
        &self.rules
    }

    pub(crate) fn endpoint(&self, version: &str, path: &str) -> String {
        format!("{}/{}/{}", self.url(), version, path)
    }

    /// Send a request and return the raw body.
    ///
    /// Dropping the returned future aborts the call. The deadline surfaces as
    /// [`Error::DeadlineExceeded`].
    pub(crate) async fn send(&self, op: &'static str, request: ApiRequest) -> Result<Vec<u8>> {
        debug!(op, method = %request.method, url = %request.url, "sending request");
        match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(source)) => Err(Error::Transport { op, source }),
            Err(_) => Err(Error::DeadlineExceeded(op)),
        }
    }

    /// Send a request and decode the JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        op: &'static str,
        request: ApiRequest,
    ) -> Result<T> {
        let body = self.send(op, request).await?;
        serde_json::from_slice(&body).map_err(|source| Error::Decode { op, source })
    }
}

/// Decode a field that may be `null` on the wire as its default value.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn encode<T: Serialize>(op: &'static str, value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|source| Error::Encode { op, source })
}
