//! The `dt_contact_group` resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_state, encode_state};
use crate::client::contacts::{ContactGroup, CreateContactGroupRequest, UpdateContactGroupRequest};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::names::{parse_resource_name, Parent, ParentType};
use crate::types::Diagnostic;

/// Resource type name.
pub const TYPE_NAME: &str = "dt_contact_group";

/// Terraform state of a contact group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactGroupState {
    /// Computed. `organizations/{organization}/contactGroups/{contact_group}`
    pub name: String,
    /// `organizations/{organization}`
    pub organization: String,
    pub display_name: String,
    pub description: String,
    /// Computed.
    pub contact_count: i32,
}

impl ContactGroupState {
    fn from_group(group: ContactGroup) -> Result<Self> {
        let (organization_id, _) = parse_resource_name(&group.name)?;
        Ok(Self {
            organization: format!("organizations/{}", organization_id),
            name: group.name,
            display_name: group.display_name,
            description: group.description,
            contact_count: group.contact_count,
        })
    }

    fn to_create_request(&self) -> CreateContactGroupRequest {
        CreateContactGroupRequest {
            organization: self.organization.clone(),
            contact_group: ContactGroup {
                name: self.name.clone(),
                display_name: self.display_name.clone(),
                description: self.description.clone(),
                contact_count: self.contact_count,
            },
        }
    }

    fn to_update_request(&self) -> UpdateContactGroupRequest {
        UpdateContactGroupRequest {
            display_name: self.display_name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Check the configured attributes of a contact group.
pub fn validate(config: Value) -> Vec<Diagnostic> {
    let state: ContactGroupState = match decode_state(config) {
        Ok(state) => state,
        Err(e) => return vec![Diagnostic::from(&e)],
    };

    let mut diagnostics = Vec::new();
    if !matches!(Parent::parse(&state.organization), Ok(p) if p.kind == ParentType::Organizations)
    {
        diagnostics.push(
            Diagnostic::error("Organization is required")
                .with_detail(r#"organization must have the form "organizations/{organization}""#)
                .with_attribute("organization"),
        );
    }
    if state.display_name.is_empty() {
        diagnostics.push(
            Diagnostic::error("Display name is required").with_attribute("display_name"),
        );
    }
    diagnostics
}

pub(crate) async fn create(client: &Client, planned_state: Value) -> Result<Value> {
    let plan: ContactGroupState = decode_state(planned_state)?;
    if plan.organization.is_empty() {
        return Err(Error::Validation("organization is required".to_string()));
    }
    let created = client.create_contact_group(&plan.to_create_request()).await?;
    encode_state(&ContactGroupState::from_group(created)?)
}

pub(crate) async fn read(client: &Client, current_state: Value) -> Result<Value> {
    let state: ContactGroupState = decode_state(current_state)?;
    let group = client.get_contact_group(&state.name).await?;
    encode_state(&ContactGroupState::from_group(group)?)
}

pub(crate) async fn update(
    client: &Client,
    prior_state: Value,
    planned_state: Value,
) -> Result<Value> {
    let prior: ContactGroupState = decode_state(prior_state)?;
    let mut plan: ContactGroupState = decode_state(planned_state)?;
    if plan.name.is_empty() {
        plan.name = prior.name;
    }
    if plan.display_name.is_empty() {
        return Err(Error::Validation("display name is required".to_string()));
    }

    let updated = client
        .update_contact_group(&plan.to_update_request(), &plan.name)
        .await?;
    encode_state(&ContactGroupState::from_group(updated)?)
}

pub(crate) async fn delete(client: &Client, current_state: Value) -> Result<()> {
    let state: ContactGroupState = decode_state(current_state)?;
    client.delete_contact_group(&state.name).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::provider::{DtProvider, ProviderService};
    use crate::testing::{assert_no_errors, MockTransport, ProviderTester};

    fn api_group(description: &str) -> String {
        json!({
            "name": "organizations/o1/contactGroups/g1",
            "displayName": "On call",
            "description": description,
            "contactCount": 3
        })
        .to_string()
    }

    fn tester(transport: &Arc<MockTransport>) -> ProviderTester<DtProvider> {
        let client = Client::new(
            "https://api.example.com",
            Arc::clone(transport) as Arc<dyn crate::client::Transport>,
        );
        ProviderTester::new(DtProvider::with_client(client))
    }

    #[tokio::test]
    async fn test_contact_group_create_and_read() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(api_group(""));
        transport.push_body(api_group(""));
        let tester = tester(&transport);

        let state = tester
            .lifecycle_create(
                TYPE_NAME,
                json!({"organization": "organizations/o1", "display_name": "On call"}),
            )
            .await
            .unwrap();

        assert_eq!(state["name"], "organizations/o1/contactGroups/g1");
        assert_eq!(state["organization"], "organizations/o1");
        assert_eq!(state["contact_count"], 3);
        assert_eq!(
            transport.requests()[1].url,
            "https://api.example.com/v2/organizations/o1/contactGroups/g1"
        );
    }

    #[tokio::test]
    async fn test_contact_group_update_keeps_prior_name() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(api_group("Night shift"));
        let tester = tester(&transport);

        let state = tester
            .update(
                TYPE_NAME,
                json!({
                    "name": "organizations/o1/contactGroups/g1",
                    "organization": "organizations/o1",
                    "display_name": "On call",
                }),
                json!({
                    "organization": "organizations/o1",
                    "display_name": "On call",
                    "description": "Night shift",
                }),
            )
            .await
            .unwrap();
        assert_eq!(state["description"], "Night shift");
        assert_eq!(
            transport.requests()[0].url,
            "https://api.example.com/v2/organizations/o1/contactGroups/g1"
        );
    }

    #[tokio::test]
    async fn test_create_without_organization_makes_no_request() {
        let transport = Arc::new(MockTransport::new());
        let tester = tester(&transport);

        let err = tester
            .create(TYPE_NAME, json!({"display_name": "On call"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_resource_config() {
        let transport = Arc::new(MockTransport::new());
        let tester = tester(&transport);

        tester
            .validate_resource_config(
                TYPE_NAME,
                json!({"organization": "organizations/o1", "display_name": "On call"}),
            )
            .await
            .unwrap();

        let diagnostics = tester
            .provider()
            .validate_resource_config(TYPE_NAME, json!({"organization": "projects/p1"}))
            .await
            .unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert_no_errors(&validate(json!({
            "organization": "organizations/o1",
            "display_name": "x",
        })));
    }
}
