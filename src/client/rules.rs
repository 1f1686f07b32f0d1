//! Notification rules.
//!
//! The rules API has no single-rule read endpoint, only a list per project or
//! organization. [`Client::get_notification_rule`] therefore reads through the
//! client's [`RuleCache`](crate::cache::RuleCache): on a miss it lists the
//! rule's parent, caches every rule in the list and then looks the requested
//! name up again. Create, update and delete go straight to the API and leave
//! the cache alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{encode, null_default, ApiRequest, Client, Method, RULES_API_VERSION};
use crate::error::{Error, Result};
use crate::names::{Parent, RuleName};

/// Response body of the list rules endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListNotificationRulesResponse {
    /// All rules of the parent.
    #[serde(rename = "rules", default, deserialize_with = "null_default")]
    pub notification_rules: Vec<NotificationRule>,
}

/// A notification rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationRule {
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_default")]
    pub devices: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub device_labels: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_default")]
    pub project_labels: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_default")]
    pub trigger: Trigger,
    #[serde(deserialize_with = "null_default")]
    pub escalation_levels: Vec<EscalationLevel>,
    pub schedule: Option<Schedule>,
    pub trigger_delay: Option<String>,
    #[serde(rename = "reminderNotifications", deserialize_with = "null_default")]
    pub reminder_notification: bool,
    #[serde(rename = "resolvedNotifications", deserialize_with = "null_default")]
    pub resolved_notification: bool,
    pub unacknowledges_after: Option<String>,
    /// Deprecated flat action list, superseded by `escalation_levels`.
    #[serde(deserialize_with = "null_default")]
    pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscalationLevel {
    #[serde(deserialize_with = "null_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_default")]
    pub actions: Vec<NotificationAction>,
    pub escalate_after: Option<String>,
}

/// An action taken when a rule triggers. Only the config matching `type` is
/// expected to be set; some action types are not available to all customers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationAction {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub action_type: String,
    #[serde(rename = "sms")]
    pub sms_config: Option<SmsConfig>,
    #[serde(rename = "email")]
    pub email_config: Option<EmailConfig>,
    #[serde(rename = "corrigo")]
    pub corrigo_config: Option<CorrigoConfig>,
    #[serde(rename = "serviceChannel")]
    pub service_channel_config: Option<ServiceChannelConfig>,
    #[serde(rename = "webhook")]
    pub webhook_config: Option<WebhookConfig>,
    #[serde(rename = "phoneCall")]
    pub phone_call_config: Option<PhoneCallConfig>,
    #[serde(rename = "signalTower")]
    pub signal_tower_config: Option<SignalTowerConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmsConfig {
    #[serde(deserialize_with = "null_default")]
    pub recipients: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub contact_groups: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailConfig {
    #[serde(deserialize_with = "null_default")]
    pub recipients: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub contact_groups: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_default")]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorrigoConfig {
    #[serde(deserialize_with = "null_default")]
    pub asset_id: String,
    #[serde(deserialize_with = "null_default")]
    pub task_id: String,
    #[serde(deserialize_with = "null_default")]
    pub customer_id: String,
    #[serde(deserialize_with = "null_default")]
    pub client_id: String,
    #[serde(deserialize_with = "null_default")]
    pub client_secret: String,
    #[serde(deserialize_with = "null_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_default")]
    pub sub_type_id: String,
    #[serde(deserialize_with = "null_default")]
    pub contact_name: String,
    #[serde(deserialize_with = "null_default")]
    pub contact_address: String,
    #[serde(deserialize_with = "null_default")]
    pub work_order_description: String,
    #[serde(deserialize_with = "null_default")]
    pub studio_dashboard_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceChannelConfig {
    #[serde(deserialize_with = "null_default")]
    pub store_id: String,
    #[serde(deserialize_with = "null_default")]
    pub asset_tag_id: String,
    #[serde(deserialize_with = "null_default")]
    pub trade: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookConfig {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub signature_secret: String,
    #[serde(deserialize_with = "null_default")]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhoneCallConfig {
    #[serde(deserialize_with = "null_default")]
    pub recipients: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub contact_groups: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub introduction: String,
    #[serde(deserialize_with = "null_default")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalTowerConfig {
    #[serde(deserialize_with = "null_default")]
    pub cloud_connector_name: String,
}

/// The sensor condition that fires a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trigger {
    #[serde(deserialize_with = "null_default")]
    pub field: String,
    pub range: Option<Range>,
    pub presence: Option<String>,
    pub motion: Option<String>,
    pub occupancy: Option<String>,
    pub connection: Option<String>,
    pub contact: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub trigger_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Range {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub range_type: String,
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filter {
    /// Present (as an empty object) when the filter is enabled.
    pub product_equivalent_temperature: Option<EmptyObject>,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyObject {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    #[serde(deserialize_with = "null_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_default")]
    pub slots: Vec<Slot>,
    #[serde(deserialize_with = "null_default")]
    pub inverse: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slot {
    #[serde(rename = "days", deserialize_with = "null_default")]
    pub days_of_week: Vec<String>,
    #[serde(rename = "times", deserialize_with = "null_default")]
    pub time_range: Vec<TimeRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRange {
    #[serde(deserialize_with = "null_default")]
    pub start: TimeOfDay,
    #[serde(deserialize_with = "null_default")]
    pub end: TimeOfDay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOfDay {
    #[serde(deserialize_with = "null_default")]
    pub hour: i32,
    #[serde(deserialize_with = "null_default")]
    pub minute: i32,
}

impl Client {
    /// Get a notification rule by its full resource name.
    ///
    /// Served from the rule cache when possible. On a miss the rule's parent is
    /// listed and every returned rule is cached before the name is looked up
    /// again; a name missing from that list yields [`Error::NotFound`].
    #[instrument(name = "Client::get_notification_rule", skip(self))]
    pub async fn get_notification_rule(&self, name: &str) -> Result<NotificationRule> {
        if let Some(rule) = self.rules.get(name) {
            debug!("notification rule cache hit");
            return Ok(rule);
        }

        let parent = RuleName::parse(name)?.parent;
        debug!(%parent, "notification rule cache miss, listing parent");

        let response = self.list_notification_rules(&parent).await?;
        debug!(
            count = response.notification_rules.len(),
            "populating notification rule cache"
        );
        for rule in response.notification_rules {
            self.rules.set(rule);
        }

        self.rules
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// List all notification rules of a project or organization.
    #[instrument(name = "Client::list_notification_rules", skip(self), fields(parent = %parent))]
    pub async fn list_notification_rules(
        &self,
        parent: &Parent,
    ) -> Result<ListNotificationRulesResponse> {
        let url = self.endpoint(RULES_API_VERSION, &format!("{}/rules", parent));
        self.send_json(
            "list notification rules",
            ApiRequest::new(Method::GET, url),
        )
        .await
    }

    /// Create a notification rule under `parent`.
    #[instrument(
        name = "Client::create_notification_rule",
        skip(self, rule),
        fields(parent = %parent),
    )]
    pub async fn create_notification_rule(
        &self,
        parent: &Parent,
        rule: &NotificationRule,
    ) -> Result<NotificationRule> {
        const OP: &str = "create notification rule";
        let url = self.endpoint(RULES_API_VERSION, &format!("{}/rules", parent));
        let body = encode(OP, rule)?;
        self.send_json(OP, ApiRequest::new(Method::POST, url).with_body(body))
            .await
    }

    /// Replace an existing notification rule. The target is taken from
    /// `rule.name`.
    #[instrument(
        name = "Client::update_notification_rule",
        skip(self, rule),
        fields(name = %rule.name),
    )]
    pub async fn update_notification_rule(
        &self,
        rule: &NotificationRule,
    ) -> Result<NotificationRule> {
        const OP: &str = "update notification rule";
        let name = RuleName::parse(&rule.name)?;
        let url = self.endpoint(RULES_API_VERSION, &name.to_string());
        let body = encode(OP, rule)?;
        self.send_json(OP, ApiRequest::new(Method::PUT, url).with_body(body))
            .await
    }

    /// Delete a notification rule.
    #[instrument(name = "Client::delete_notification_rule", skip(self))]
    pub async fn delete_notification_rule(&self, name: &str) -> Result<()> {
        let name = RuleName::parse(name)?;
        let url = self.endpoint(RULES_API_VERSION, &name.to_string());
        self.send(
            "delete notification rule",
            ApiRequest::new(Method::DELETE, url),
        )
        .await?;
        Ok(())
    }
}
