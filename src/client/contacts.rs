//! Contacts and contact groups.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{encode, null_default, ApiRequest, Client, Method, API_VERSION};
use crate::error::Result;
use crate::names::parse_resource_name;

/// A contact that can receive notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    /// `projects/{project}/contacts/{contact}`
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// `organizations/{organization}/contactGroups/{contact_group}`
    #[serde(deserialize_with = "null_default")]
    pub contact_group: String,
    #[serde(deserialize_with = "null_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
    #[serde(deserialize_with = "null_default")]
    pub phone_number: String,
    #[serde(deserialize_with = "null_default")]
    pub has_project_access: bool,
}

/// Parameters for [`Client::create_contact`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContactRequest {
    /// `projects/{project}`
    pub project: String,
    pub contact: Contact,
}

/// Body of a contact update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    pub contact_group: String,
    pub display_name: String,
    pub email: String,
    pub phone_number: String,
}

/// A named group of contacts within an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactGroup {
    /// `organizations/{organization}/contactGroups/{contact_group}`
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub contact_count: i32,
}

/// Parameters for [`Client::create_contact_group`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactGroupRequest {
    /// `organizations/{organization}`
    pub organization: String,
    pub contact_group: ContactGroup,
}

/// Body of a contact group update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactGroupRequest {
    pub display_name: String,
    pub description: String,
}

impl Client {
    /// Get a contact by resource name.
    #[instrument(name = "Client::get_contact", skip(self))]
    pub async fn get_contact(&self, name: &str) -> Result<Contact> {
        let url = self.endpoint(API_VERSION, name);
        self.send_json("get contact", ApiRequest::new(Method::GET, url))
            .await
    }

    /// Create a contact in `request.project`.
    #[instrument(
        name = "Client::create_contact",
        skip(self, request),
        fields(project = %request.project),
    )]
    pub async fn create_contact(&self, request: &CreateContactRequest) -> Result<Contact> {
        const OP: &str = "create contact";
        let url = self.endpoint(API_VERSION, &format!("{}/contacts", request.project));
        let body = encode(OP, &request.contact)?;
        self.send_json(OP, ApiRequest::new(Method::POST, url).with_body(body))
            .await
    }

    /// Update the contact called `name`.
    #[instrument(name = "Client::update_contact", skip(self, request))]
    pub async fn update_contact(
        &self,
        request: &UpdateContactRequest,
        name: &str,
    ) -> Result<Contact> {
        const OP: &str = "update contact";
        let url = self.endpoint(API_VERSION, name);
        let body = encode(OP, request)?;
        self.send_json(OP, ApiRequest::new(Method::PATCH, url).with_body(body))
            .await
    }

    /// Delete a contact.
    #[instrument(name = "Client::delete_contact", skip(self))]
    pub async fn delete_contact(&self, name: &str) -> Result<()> {
        let url = self.endpoint(API_VERSION, name);
        self.send("delete contact", ApiRequest::new(Method::DELETE, url))
            .await?;
        Ok(())
    }

    /// Get a contact group by resource name.
    #[instrument(name = "Client::get_contact_group", skip(self))]
    pub async fn get_contact_group(&self, name: &str) -> Result<ContactGroup> {
        let (organization_id, group_id) = parse_resource_name(name)?;
        let url = self.endpoint(
            API_VERSION,
            &format!(
                "organizations/{}/contactGroups/{}",
                organization_id, group_id
            ),
        );
        self.send_json("get contact group", ApiRequest::new(Method::GET, url))
            .await
    }

    /// Create a contact group in `request.organization`.
    #[instrument(
        name = "Client::create_contact_group",
        skip(self, request),
        fields(organization = %request.organization),
    )]
    pub async fn create_contact_group(
        &self,
        request: &CreateContactGroupRequest,
    ) -> Result<ContactGroup> {
        const OP: &str = "create contact group";
        let url = self.endpoint(
            API_VERSION,
            &format!("{}/contactGroups", request.organization),
        );
        let body = encode(OP, &request.contact_group)?;
        self.send_json(OP, ApiRequest::new(Method::POST, url).with_body(body))
            .await
    }

    /// Update the contact group called `name`.
    #[instrument(name = "Client::update_contact_group", skip(self, request))]
    pub async fn update_contact_group(
        &self,
        request: &UpdateContactGroupRequest,
        name: &str,
    ) -> Result<ContactGroup> {
        const OP: &str = "update contact group";
        let url = self.endpoint(API_VERSION, name);
        let body = encode(OP, request)?;
        self.send_json(OP, ApiRequest::new(Method::PATCH, url).with_body(body))
            .await
    }

    /// Delete a contact group.
    #[instrument(name = "Client::delete_contact_group", skip(self))]
    pub async fn delete_contact_group(&self, name: &str) -> Result<()> {
        let url = self.endpoint(API_VERSION, name);
        self.send("delete contact group", ApiRequest::new(Method::DELETE, url))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::testing::MockTransport;

    const BASE: &str = "https://api.example.com";

    fn client(transport: &Arc<MockTransport>) -> Client {
        Client::new(BASE, Arc::clone(transport) as Arc<dyn crate::client::Transport>)
    }

    fn body_json(transport: &MockTransport, index: usize) -> serde_json::Value {
        let requests = transport.requests();
        serde_json::from_slice(requests[index].body.as_deref().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_contact_crud_requests() {
        let transport = Arc::new(MockTransport::new());
        let contact = json!({
            "name": "projects/p1/contacts/c1",
            "contactGroup": "organizations/o1/contactGroups/g1",
            "displayName": "Ola Nordmann",
            "email": "ola@example.com",
            "phoneNumber": "",
            "hasProjectAccess": true
        });
        transport.push_body(contact.to_string());
        transport.push_body(contact.to_string());
        transport.push_body(contact.to_string());
        transport.push_body("");
        let client = client(&transport);

        let created = client
            .create_contact(&CreateContactRequest {
                project: "projects/p1".to_string(),
                contact: Contact {
                    contact_group: "organizations/o1/contactGroups/g1".to_string(),
                    display_name: "Ola Nordmann".to_string(),
                    email: "ola@example.com".to_string(),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(created.name, "projects/p1/contacts/c1");
        assert!(created.has_project_access);

        let read = client.get_contact("projects/p1/contacts/c1").await.unwrap();
        assert_eq!(read, created);

        client
            .update_contact(
                &UpdateContactRequest {
                    contact_group: "organizations/o1/contactGroups/g1".to_string(),
                    display_name: "Kari Nordmann".to_string(),
                    email: String::new(),
                    phone_number: "+4712345678".to_string(),
                },
                "projects/p1/contacts/c1",
            )
            .await
            .unwrap();
        client
            .delete_contact("projects/p1/contacts/c1")
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url, format!("{}/v2/projects/p1/contacts", BASE));
        assert_eq!(body_json(&transport, 0)["displayName"], "Ola Nordmann");
        assert_eq!(requests[1].method, Method::GET);
        assert_eq!(requests[1].url, format!("{}/v2/projects/p1/contacts/c1", BASE));
        assert_eq!(requests[2].method, Method::PATCH);
        assert_eq!(body_json(&transport, 2)["phoneNumber"], "+4712345678");
        assert_eq!(requests[3].method, Method::DELETE);
        assert_eq!(requests[3].url, requests[1].url);
    }

    #[tokio::test]
    async fn test_contact_group_crud_requests() {
        let transport = Arc::new(MockTransport::new());
        let group = json!({
            "name": "organizations/o1/contactGroups/g1",
            "displayName": "On call",
            "description": "",
            "contactCount": 0
        });
        transport.push_body(group.to_string());
        transport.push_body(group.to_string());
        transport.push_body(group.to_string());
        transport.push_body("");
        let client = client(&transport);

        let created = client
            .create_contact_group(&CreateContactGroupRequest {
                organization: "organizations/o1".to_string(),
                contact_group: ContactGroup {
                    display_name: "On call".to_string(),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(created.contact_count, 0);

        client
            .get_contact_group("organizations/o1/contactGroups/g1")
            .await
            .unwrap();
        client
            .update_contact_group(
                &UpdateContactGroupRequest {
                    display_name: "On call".to_string(),
                    description: "Night shift".to_string(),
                },
                "organizations/o1/contactGroups/g1",
            )
            .await
            .unwrap();
        client
            .delete_contact_group("organizations/o1/contactGroups/g1")
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            format!("{}/v2/organizations/o1/contactGroups", BASE)
        );
        assert_eq!(
            requests[1].url,
            format!("{}/v2/organizations/o1/contactGroups/g1", BASE)
        );
        assert_eq!(body_json(&transport, 2)["description"], "Night shift");
        assert_eq!(requests[3].method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_get_contact_group_rejects_malformed_name() {
        let transport = Arc::new(MockTransport::new());
        let client = client(&transport);

        let err = client
            .get_contact_group("organizations/o1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidResourceName(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_contact_reports_not_found() {
        let transport = Arc::new(MockTransport::new());
        transport.push_status(404, r#"{"error":"not found"}"#);
        let client = client(&transport);

        let err = client
            .get_contact("projects/p1/contacts/gone")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_null_fields_decode_as_defaults() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(
            json!({
                "name": "projects/p1/contacts/c1",
                "contactGroup": null,
                "displayName": "Ola",
                "email": null,
                "phoneNumber": null,
                "hasProjectAccess": null
            })
            .to_string(),
        );
        let client = client(&transport);

        let contact = client.get_contact("projects/p1/contacts/c1").await.unwrap();
        assert_eq!(contact.display_name, "Ola");
        assert!(contact.contact_group.is_empty());
        assert!(contact.email.is_empty());
        assert!(!contact.has_project_access);
    }
}
