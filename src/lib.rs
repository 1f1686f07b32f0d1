//! Disruptive Technologies provider core
//!
//! This crate holds the resource logic behind a Terraform provider for the
//! Disruptive Technologies IoT platform: an API client, resource name
//! parsing, and the provider operations for contacts, contact groups and
//! notification rules.
//!
//! # Overview
//!
//! - **Client**: [`Client`] talks to the DT REST API through a pluggable
//!   [`Transport`](client::Transport) and owns a per-client rule cache
//! - **Rule resolution**: [`Client::get_notification_rule`] serves reads from
//!   the cache and, on a miss, lists every rule under the parent project or
//!   organization and caches them all
//! - **Names**: [`names`] parses `{parentType}/{parentID}/rules/{ruleID}` and
//!   related resource names
//! - **Provider**: [`DtProvider`] implements [`ProviderService`] and maps
//!   resource state to API calls
//! - **Logging**: integration with `tracing`
//!
//! # Quick Start
//!
//! ```ignore
//! use dt_provider::{DtProvider, ProviderService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> dt_provider::Result<()> {
//!     dt_provider::init_logging();
//!
//!     let provider = DtProvider::new();
//!     provider
//!         .configure(json!({"key_id": "...", "key_secret": "..."}))
//!         .await?;
//!
//!     let state = provider
//!         .read(
//!             "dt_notification_rule",
//!             json!({"name": "projects/my-project/rules/my-rule"}),
//!         )
//!         .await?;
//!     println!("{}", state["display_name"]);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod cache;
pub mod client;
pub mod error;
pub mod logging;
pub mod names;
pub mod provider;
pub mod testing;
pub mod types;

// Re-export main types at crate root
pub use cache::RuleCache;
pub use client::Client;
pub use error::{Error, Result, TransportError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use names::{Parent, ParentType, RuleName};
pub use provider::{DtProvider, ProviderConfig, ProviderService, ResourceType};
pub use types::{Diagnostic, DiagnosticSeverity, ImportedResource, ProviderMetadata};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
