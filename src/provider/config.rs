//! Provider configuration.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{Client, Credentials, HttpTransport, DEFAULT_API_URL};
use crate::error::{Error, Result};
use crate::types::Diagnostic;

/// Environment variable overriding the API URL.
pub const ENV_API_URL: &str = "DT_API_URL";
/// Environment variable holding the service account key ID.
pub const ENV_KEY_ID: &str = "DT_API_KEY_ID";
/// Environment variable holding the service account key secret.
pub const ENV_KEY_SECRET: &str = "DT_API_KEY_SECRET";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// The provider block as sent by the host.
///
/// Attributes left unset fall back to the `DT_API_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the DT REST API.
    pub url: Option<String>,
    /// Service account key ID.
    pub key_id: Option<String>,
    /// Service account key secret.
    pub key_secret: Option<String>,
    /// Per-request deadline in seconds.
    pub timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// Parse the provider block. `null` is treated as an empty block.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Fill unset attributes from `lookup`, normally `std::env::var`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if self.url.is_none() {
            self.url = non_empty(ENV_API_URL);
        }
        if self.key_id.is_none() {
            self.key_id = non_empty(ENV_KEY_ID);
        }
        if self.key_secret.is_none() {
            self.key_secret = non_empty(ENV_KEY_SECRET);
        }
        self
    }

    /// Report missing or invalid attributes.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.key_id.as_deref().unwrap_or_default().is_empty() {
            diagnostics.push(
                Diagnostic::error("Missing API key ID")
                    .with_detail(format!("Set key_id or the {} environment variable", ENV_KEY_ID))
                    .with_attribute("key_id"),
            );
        }
        if self.key_secret.as_deref().unwrap_or_default().is_empty() {
            diagnostics.push(
                Diagnostic::error("Missing API key secret")
                    .with_detail(format!(
                        "Set key_secret or the {} environment variable",
                        ENV_KEY_SECRET
                    ))
                    .with_attribute("key_secret"),
            );
        }
        if let Some(url) = &self.url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                diagnostics.push(
                    Diagnostic::error("Invalid API URL")
                        .with_detail(format!("Expected an http(s) URL, got {:?}", url))
                        .with_attribute("url"),
                );
            }
        }
        if self.timeout_seconds == Some(0) {
            diagnostics.push(
                Diagnostic::error("Invalid timeout")
                    .with_detail("timeout_seconds must be greater than zero")
                    .with_attribute("timeout_seconds"),
            );
        }

        diagnostics
    }

    /// The effective per-request deadline.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Build an HTTP-backed client. Call [`validate`](Self::validate) first.
    pub fn build_client(&self) -> Result<Client> {
        let (Some(key_id), Some(key_secret)) = (&self.key_id, &self.key_secret) else {
            return Err(Error::Configuration(
                "key_id and key_secret are required".to_string(),
            ));
        };

        let transport = HttpTransport::new(
            Credentials {
                key_id: key_id.clone(),
                key_secret: key_secret.clone(),
            },
            self.timeout(),
        )
        .map_err(|e| Error::Configuration(e.to_string()))?;

        let url = self.url.as_deref().unwrap_or(DEFAULT_API_URL);
        Ok(Client::new(url, Arc::new(transport)).with_timeout(self.timeout()))
    }
}
