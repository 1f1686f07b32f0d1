//! Resource operations exposed to the host runtime.
//!
//! The host owns planning, state storage and the plugin protocol. It calls
//! into a [`ProviderService`] with resource state as JSON and stores what
//! comes back. [`DtProvider`] serves three resource types:
//!
//! - `dt_contact`
//! - `dt_contact_group`
//! - `dt_notification_rule`
//!
//! Notification rule reads go through the client's rule cache; all other
//! operations call the API directly.

pub mod config;
pub mod contact;
pub mod contact_group;
pub mod notification_rule;

use std::str::FromStr;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::types::{Diagnostic, ImportedResource, ProviderMetadata};

pub use config::ProviderConfig;

/// Operations the host runtime calls on a provider.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    /// Resource types served by this provider.
    fn metadata(&self) -> ProviderMetadata;

    /// Configure the provider with credentials and settings.
    /// Returns diagnostics (errors and warnings).
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>>;

    /// Validate a resource's configuration before planning.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Create a new resource.
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value>;

    /// Read the current state of a resource.
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value>;

    /// Update an existing resource.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value>;

    /// Delete a resource.
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<()>;

    /// Import existing infrastructure into management.
    async fn import_resource(
        &self,
        resource_type: &str,
        _id: &str,
    ) -> Result<Vec<ImportedResource>> {
        Err(Error::UnknownResource(format!(
            "import not supported for resource type: {}",
            resource_type
        )))
    }
}

/// Resource types served by [`DtProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    /// `dt_contact`
    Contact,
    /// `dt_contact_group`
    ContactGroup,
    /// `dt_notification_rule`
    NotificationRule,
}

impl ResourceType {
    /// Every resource type, in the order reported by metadata.
    pub const ALL: [ResourceType; 3] = [
        ResourceType::Contact,
        ResourceType::ContactGroup,
        ResourceType::NotificationRule,
    ];

    /// The type name used in configuration.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Contact => contact::TYPE_NAME,
            Self::ContactGroup => contact_group::TYPE_NAME,
            Self::NotificationRule => notification_rule::TYPE_NAME,
        }
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.type_name() == s)
            .ok_or_else(|| Error::UnknownResource(s.to_string()))
    }
}

/// Provider for the Disruptive Technologies platform.
///
/// Holds the API client created by [`configure`](ProviderService::configure).
/// All resource operations share that client and therefore its rule cache.
#[derive(Debug, Default)]
pub struct DtProvider {
    client: RwLock<Option<Client>>,
}

impl DtProvider {
    /// Create an unconfigured provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that is already configured with `client`.
    pub fn with_client(client: Client) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    fn client(&self) -> Result<Client> {
        self.client.read().clone().ok_or(Error::NotConfigured)
    }
}

/// Deserialize resource state, reporting shape errors as validation errors.
pub(crate) fn decode_state<T: DeserializeOwned>(state: Value) -> Result<T> {
    serde_json::from_value(state).map_err(|e| Error::Validation(e.to_string()))
}

/// Serialize resource state for the host.
pub(crate) fn encode_state<T: serde::Serialize>(state: &T) -> Result<Value> {
    serde_json::to_value(state).map_err(|source| Error::Encode {
        op: "encode resource state",
        source,
    })
}

#[async_trait::async_trait]
impl ProviderService for DtProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            resources: ResourceType::ALL
                .iter()
                .map(|t| t.type_name().to_string())
                .collect(),
        }
    }

    #[instrument(skip(self, config), name = "provider.configure")]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>> {
        let config =
            ProviderConfig::from_value(config)?.with_env(|key| std::env::var(key).ok());

        let diagnostics = config.validate();
        if diagnostics.iter().any(Diagnostic::is_error) {
            warn!(
                diagnostics = diagnostics.len(),
                "provider configuration rejected"
            );
            return Ok(diagnostics);
        }

        let client = config.build_client()?;
        info!(url = %client.url(), "provider configured");
        *self.client.write() = Some(client);
        Ok(diagnostics)
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>> {
        let diagnostics = match resource_type.parse::<ResourceType>()? {
            ResourceType::Contact => contact::validate(config),
            ResourceType::ContactGroup => contact_group::validate(config),
            ResourceType::NotificationRule => notification_rule::validate(config),
        };
        debug!(
            resource_type,
            diagnostics = diagnostics.len(),
            "validated resource config"
        );
        Ok(diagnostics)
    }

    #[instrument(skip(self, planned_state), name = "provider.create")]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value> {
        let kind = resource_type.parse::<ResourceType>()?;
        let client = self.client()?;
        let result = match kind {
            ResourceType::Contact => contact::create(&client, planned_state).await,
            ResourceType::ContactGroup => contact_group::create(&client, planned_state).await,
            ResourceType::NotificationRule => {
                notification_rule::create(&client, planned_state).await
            }
        };
        log_result("create", &result);
        result
    }

    #[instrument(skip(self, current_state), name = "provider.read")]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value> {
        let kind = resource_type.parse::<ResourceType>()?;
        let client = self.client()?;
        let result = match kind {
            ResourceType::Contact => contact::read(&client, current_state).await,
            ResourceType::ContactGroup => contact_group::read(&client, current_state).await,
            ResourceType::NotificationRule => {
                notification_rule::read(&client, current_state).await
            }
        };
        log_result("read", &result);
        result
    }

    #[instrument(skip(self, prior_state, planned_state), name = "provider.update")]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value> {
        let kind = resource_type.parse::<ResourceType>()?;
        let client = self.client()?;
        let result = match kind {
            ResourceType::Contact => contact::update(&client, prior_state, planned_state).await,
            ResourceType::ContactGroup => {
                contact_group::update(&client, prior_state, planned_state).await
            }
            ResourceType::NotificationRule => {
                notification_rule::update(&client, prior_state, planned_state).await
            }
        };
        log_result("update", &result);
        result
    }

    #[instrument(skip(self, current_state), name = "provider.delete")]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<()> {
        let kind = resource_type.parse::<ResourceType>()?;
        let client = self.client()?;
        let result = match kind {
            ResourceType::Contact => contact::delete(&client, current_state).await,
            ResourceType::ContactGroup => contact_group::delete(&client, current_state).await,
            ResourceType::NotificationRule => {
                notification_rule::delete(&client, current_state).await
            }
        };
        log_result("delete", &result);
        result
    }

    /// Imports pass the ID through as the resource name and read it.
    #[instrument(skip(self), name = "provider.import_resource")]
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>> {
        let state = self
            .read(resource_type, serde_json::json!({ "name": id }))
            .await?;
        Ok(vec![ImportedResource::new(resource_type, state)])
    }
}

fn log_result<T>(operation: &str, result: &Result<T>) {
    match result {
        Ok(_) => debug!(operation, "resource operation completed"),
        Err(e) => error!(operation, error = %e, "resource operation failed"),
    }
}
