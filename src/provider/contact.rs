//! The `dt_contact` resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_state, encode_state};
use crate::client::contacts::{Contact, CreateContactRequest, UpdateContactRequest};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::names::{parse_resource_name, Parent, ParentType};
use crate::types::Diagnostic;

/// Resource type name.
pub const TYPE_NAME: &str = "dt_contact";

const MAX_DISPLAY_NAME_LEN: usize = 100;

/// Terraform state of a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactState {
    /// Computed. `projects/{project}/contacts/{contact}`
    pub name: String,
    /// `organizations/{organization}/contactGroups/{contact_group}`
    pub contact_group: String,
    /// `projects/{project}`
    pub project: String,
    pub display_name: String,
    pub email: String,
    pub phone_number: String,
    /// Computed.
    pub has_project_access: bool,
}

impl ContactState {
    fn from_contact(contact: Contact) -> Result<Self> {
        let (project_id, _) = parse_resource_name(&contact.name)?;
        Ok(Self {
            project: format!("projects/{}", project_id),
            name: contact.name,
            contact_group: contact.contact_group,
            display_name: contact.display_name,
            email: contact.email,
            phone_number: contact.phone_number,
            has_project_access: contact.has_project_access,
        })
    }

    fn to_contact(&self) -> Contact {
        Contact {
            name: self.name.clone(),
            contact_group: self.contact_group.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            has_project_access: self.has_project_access,
        }
    }

    fn to_create_request(&self) -> CreateContactRequest {
        CreateContactRequest {
            project: self.project.clone(),
            contact: self.to_contact(),
        }
    }

    fn to_update_request(&self) -> UpdateContactRequest {
        UpdateContactRequest {
            contact_group: self.contact_group.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

/// Check the configured attributes of a contact.
pub fn validate(config: Value) -> Vec<Diagnostic> {
    let state: ContactState = match decode_state(config) {
        Ok(state) => state,
        Err(e) => return vec![Diagnostic::from(&e)],
    };

    let mut diagnostics = Vec::new();
    let len = state.display_name.chars().count();
    if !(1..=MAX_DISPLAY_NAME_LEN).contains(&len) {
        diagnostics.push(
            Diagnostic::error("Invalid display name")
                .with_detail(format!(
                    "display_name must be between 1 and {} characters, got {}",
                    MAX_DISPLAY_NAME_LEN, len
                ))
                .with_attribute("display_name"),
        );
    }
    if !matches!(Parent::parse(&state.project), Ok(p) if p.kind == ParentType::Projects) {
        diagnostics.push(
            Diagnostic::error("Invalid project")
                .with_detail(r#"project must have the form "projects/{project}""#)
                .with_attribute("project"),
        );
    }
    if state.contact_group.is_empty() {
        diagnostics.push(
            Diagnostic::error("Missing contact group").with_attribute("contact_group"),
        );
    }
    diagnostics
}

pub(crate) async fn create(client: &Client, planned_state: Value) -> Result<Value> {
    let plan: ContactState = decode_state(planned_state)?;
    let created = client.create_contact(&plan.to_create_request()).await?;
    encode_state(&ContactState::from_contact(created)?)
}

pub(crate) async fn read(client: &Client, current_state: Value) -> Result<Value> {
    let state: ContactState = decode_state(current_state)?;
    let contact = client.get_contact(&state.name).await?;
    encode_state(&ContactState::from_contact(contact)?)
}

pub(crate) async fn update(
    client: &Client,
    prior_state: Value,
    planned_state: Value,
) -> Result<Value> {
    let prior: ContactState = decode_state(prior_state)?;
    let mut plan: ContactState = decode_state(planned_state)?;
    if plan.name.is_empty() {
        plan.name = prior.name;
    }
    if plan.name.is_empty() {
        return Err(Error::Validation("contact has no name in state".to_string()));
    }

    let updated = client
        .update_contact(&plan.to_update_request(), &plan.name)
        .await?;
    encode_state(&ContactState::from_contact(updated)?)
}

pub(crate) async fn delete(client: &Client, current_state: Value) -> Result<()> {
    let state: ContactState = decode_state(current_state)?;
    client.delete_contact(&state.name).await
}
