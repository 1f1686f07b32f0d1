//! Testing utilities.
//!
//! [`MockTransport`] stands in for the DT API: it records every request and
//! answers with queued responses. [`ProviderTester`] drives a
//! [`ProviderService`] through resource lifecycles without a host.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dt_provider::testing::{MockTransport, ProviderTester};
//! use dt_provider::{Client, DtProvider};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_read_rule() {
//!     let transport = Arc::new(MockTransport::new());
//!     transport.push_body(json!({"rules": [{"name": "projects/p1/rules/r1"}]}).to_string());
//!
//!     let client = Client::new("https://api.example.com", transport.clone());
//!     let tester = ProviderTester::new(DtProvider::with_client(client));
//!
//!     let state = tester
//!         .read("dt_notification_rule", json!({"name": "projects/p1/rules/r1"}))
//!         .await
//!         .unwrap();
//!     assert_eq!(state["parent"], "projects/p1");
//! }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::client::{ApiRequest, Transport};
use crate::error::{Error, TransportError};
use crate::provider::ProviderService;
use crate::types::{Diagnostic, DiagnosticSeverity, ImportedResource};

enum MockResponse {
    Body(Vec<u8>),
    Status(u16, String),
}

/// A [`Transport`] that replays queued responses in order.
///
/// When the queue is empty every request fails with
/// [`TransportError::Other`].
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Create a transport with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful response with the given body.
    pub fn push_body(&self, body: impl Into<String>) {
        self.responses
            .lock()
            .push_back(MockResponse::Body(body.into().into_bytes()));
    }

    /// Queue a non-success response.
    pub fn push_status(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .push_back(MockResponse::Status(status, body.into()));
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().pop_front();
        match response {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status, body)) => {
                Err(TransportError::Status { status, body })
            }
            None => Err(TransportError::Other(
                "no mock response queued".to_string(),
            )),
        }
    }
}

/// A test harness for [`ProviderService`] implementations.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Configure the provider, failing on error diagnostics.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Validate a resource configuration, failing on error diagnostics.
    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        let diagnostics = self
            .provider
            .validate_resource_config(resource_type, config)
            .await?;
        check_diagnostics(diagnostics)
    }

    /// Create a new resource.
    pub async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, Error> {
        self.provider.create(resource_type, planned_state).await
    }

    /// Read the current state of a resource.
    pub async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, Error> {
        self.provider.read(resource_type, current_state).await
    }

    /// Update an existing resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, Error> {
        self.provider
            .update(resource_type, prior_state, planned_state)
            .await
    }

    /// Delete a resource.
    pub async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), Error> {
        self.provider.delete(resource_type, current_state).await
    }

    /// Import an existing resource.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, Error> {
        self.provider.import_resource(resource_type, id).await
    }

    /// Run create → read and return the state after read.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Value, Error> {
        let created_state = self.create(resource_type, config).await?;
        self.read(resource_type, created_state).await
    }

    /// Run create → read → update → read → delete and return the state after
    /// the update.
    pub async fn lifecycle_crud(
        &self,
        resource_type: &str,
        initial_config: Value,
        updated_config: Value,
    ) -> Result<Value, Error> {
        let created_state = self.lifecycle_create(resource_type, initial_config).await?;

        let updated_state = self
            .update(resource_type, created_state, updated_config)
            .await?;
        let updated_state = self.read(resource_type, updated_state).await?;

        self.delete(resource_type, updated_state.clone()).await?;
        Ok(updated_state)
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Vec<Diagnostic>),
    /// The operation failed with a provider error.
    Provider(Error),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

impl From<Error> for TestError {
    fn from(e: Error) -> Self {
        TestError::Provider(e)
    }
}

fn check_diagnostics(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<_> = diagnostics
        .into_iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Error))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

/// Assert that no diagnostic is an error.
///
/// # Panics
///
/// Panics if any diagnostic has error severity.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
    assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
}

/// Assert that some error diagnostic mentions `substring` in its summary or
/// detail.
///
/// # Panics
///
/// Panics if no error diagnostic matches.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let found = diagnostics.iter().filter(|d| d.is_error()).any(|d| {
        d.summary.contains(substring)
            || d.detail.as_deref().is_some_and(|detail| detail.contains(substring))
    });
    assert!(
        found,
        "Expected an error containing '{}', got: {:?}",
        substring, diagnostics
    );
}
