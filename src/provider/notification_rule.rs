//! The `dt_notification_rule` resource.
//!
//! State mirrors [`NotificationRule`] with snake_case attribute names, the
//! range and filter of the trigger flattened into the trigger block, and a
//! `parent` attribute naming the owning project or organization. Reads are
//! served by [`Client::get_notification_rule`] and so may come from the rule
//! cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_state, encode_state};
use crate::client::rules::{
    CorrigoConfig, EmailConfig, EmptyObject, EscalationLevel, Filter, NotificationAction,
    NotificationRule, PhoneCallConfig, Range, Schedule, ServiceChannelConfig, SignalTowerConfig,
    SmsConfig, Trigger, WebhookConfig,
};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::names::{Parent, RuleName};
use crate::types::Diagnostic;

/// Resource type name.
pub const TYPE_NAME: &str = "dt_notification_rule";

/// Terraform state of a notification rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationRuleState {
    /// Computed. `{parentType}/{parentID}/rules/{ruleID}`
    pub name: String,
    /// `projects/{project}` or `organizations/{organization}`
    pub parent: String,
    pub enabled: bool,
    pub display_name: String,
    pub devices: Vec<String>,
    pub device_labels: BTreeMap<String, String>,
    pub project_labels: BTreeMap<String, String>,
    pub trigger: TriggerState,
    pub escalation_levels: Vec<EscalationLevelState>,
    pub schedule: Option<Schedule>,
    pub trigger_delay: Option<String>,
    pub unacknowledges_after: Option<String>,
    pub reminder_notification: bool,
    pub resolved_notification: bool,
    /// Deprecated; use `escalation_levels`.
    pub actions: Vec<ActionState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerState {
    pub field: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub range_type: Option<String>,
    pub product_equivalent_temperature: bool,
    pub presence: Option<String>,
    pub motion: Option<String>,
    pub occupancy: Option<String>,
    pub connection: Option<String>,
    pub contact: Option<String>,
    pub trigger_count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationLevelState {
    pub display_name: String,
    pub actions: Vec<ActionState>,
    pub escalate_after: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionState {
    #[serde(rename = "type")]
    pub action_type: String,
    pub sms: Option<SmsState>,
    pub email: Option<EmailState>,
    pub corrigo: Option<CorrigoState>,
    pub service_channel: Option<ServiceChannelState>,
    pub webhook: Option<WebhookState>,
    pub phone_call: Option<PhoneCallState>,
    pub signal_tower: Option<SignalTowerState>,
}

/// Declares a snake_case state block with the same fields as an API config
/// struct, plus conversions both ways.
macro_rules! state_block {
    ($state:ident <=> $api:ident { $($field:ident: $ty:ty),* $(,)? }) => {
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $state {
            $(pub $field: $ty,)*
        }

        impl From<$api> for $state {
            fn from(api: $api) -> Self {
                Self { $($field: api.$field,)* }
            }
        }

        impl From<$state> for $api {
            fn from(state: $state) -> Self {
                Self { $($field: state.$field,)* }
            }
        }
    };
}

state_block!(SmsState <=> SmsConfig {
    recipients: Vec<String>,
    contact_groups: Vec<String>,
    body: String,
});

state_block!(EmailState <=> EmailConfig {
    recipients: Vec<String>,
    contact_groups: Vec<String>,
    subject: String,
    body: String,
});

state_block!(CorrigoState <=> CorrigoConfig {
    asset_id: String,
    task_id: String,
    customer_id: String,
    client_id: String,
    client_secret: String,
    company_name: String,
    sub_type_id: String,
    contact_name: String,
    contact_address: String,
    work_order_description: String,
    studio_dashboard_url: String,
});

state_block!(ServiceChannelState <=> ServiceChannelConfig {
    store_id: String,
    asset_tag_id: String,
    trade: String,
    description: String,
});

state_block!(WebhookState <=> WebhookConfig {
    url: String,
    signature_secret: String,
    headers: BTreeMap<String, String>,
});

state_block!(PhoneCallState <=> PhoneCallConfig {
    recipients: Vec<String>,
    contact_groups: Vec<String>,
    introduction: String,
    message: String,
});

state_block!(SignalTowerState <=> SignalTowerConfig {
    cloud_connector_name: String,
});

impl From<NotificationAction> for ActionState {
    fn from(action: NotificationAction) -> Self {
        Self {
            action_type: action.action_type,
            sms: action.sms_config.map(Into::into),
            email: action.email_config.map(Into::into),
            corrigo: action.corrigo_config.map(Into::into),
            service_channel: action.service_channel_config.map(Into::into),
            webhook: action.webhook_config.map(Into::into),
            phone_call: action.phone_call_config.map(Into::into),
            signal_tower: action.signal_tower_config.map(Into::into),
        }
    }
}

impl From<ActionState> for NotificationAction {
    fn from(state: ActionState) -> Self {
        Self {
            action_type: state.action_type,
            sms_config: state.sms.map(Into::into),
            email_config: state.email.map(Into::into),
            corrigo_config: state.corrigo.map(Into::into),
            service_channel_config: state.service_channel.map(Into::into),
            webhook_config: state.webhook.map(Into::into),
            phone_call_config: state.phone_call.map(Into::into),
            signal_tower_config: state.signal_tower.map(Into::into),
        }
    }
}

impl From<EscalationLevel> for EscalationLevelState {
    fn from(level: EscalationLevel) -> Self {
        Self {
            display_name: level.display_name,
            actions: level.actions.into_iter().map(Into::into).collect(),
            escalate_after: level.escalate_after,
        }
    }
}

impl From<EscalationLevelState> for EscalationLevel {
    fn from(state: EscalationLevelState) -> Self {
        Self {
            display_name: state.display_name,
            actions: state.actions.into_iter().map(Into::into).collect(),
            escalate_after: state.escalate_after,
        }
    }
}

impl From<Trigger> for TriggerState {
    fn from(trigger: Trigger) -> Self {
        let range = trigger.range.unwrap_or_default();
        Self {
            field: trigger.field,
            lower: range.lower,
            upper: range.upper,
            range_type: Some(range.range_type).filter(|t| !t.is_empty()),
            product_equivalent_temperature: range
                .filter
                .is_some_and(|f| f.product_equivalent_temperature.is_some()),
            presence: trigger.presence,
            motion: trigger.motion,
            occupancy: trigger.occupancy,
            connection: trigger.connection,
            contact: trigger.contact,
            trigger_count: trigger.trigger_count,
        }
    }
}

impl From<TriggerState> for Trigger {
    fn from(state: TriggerState) -> Self {
        // Only range triggers carry a range object.
        let has_range =
            state.lower.is_some() || state.upper.is_some() || state.range_type.is_some();
        let range = has_range.then(|| Range {
            lower: state.lower,
            upper: state.upper,
            range_type: state.range_type.unwrap_or_default(),
            filter: state.product_equivalent_temperature.then(|| Filter {
                product_equivalent_temperature: Some(EmptyObject {}),
            }),
        });
        Self {
            field: state.field,
            range,
            presence: state.presence,
            motion: state.motion,
            occupancy: state.occupancy,
            connection: state.connection,
            contact: state.contact,
            trigger_count: state.trigger_count,
        }
    }
}

impl NotificationRuleState {
    fn from_rule(rule: NotificationRule) -> Result<Self> {
        let parent = RuleName::parse(&rule.name)?.parent.to_string();
        Ok(Self {
            name: rule.name,
            parent,
            enabled: rule.enabled,
            display_name: rule.display_name,
            devices: rule.devices,
            device_labels: rule.device_labels,
            project_labels: rule.project_labels,
            trigger: rule.trigger.into(),
            escalation_levels: rule.escalation_levels.into_iter().map(Into::into).collect(),
            schedule: rule.schedule,
            trigger_delay: rule.trigger_delay,
            unacknowledges_after: rule.unacknowledges_after,
            reminder_notification: rule.reminder_notification,
            resolved_notification: rule.resolved_notification,
            actions: rule.actions.into_iter().map(Into::into).collect(),
        })
    }

    fn into_rule(self) -> NotificationRule {
        NotificationRule {
            name: self.name,
            enabled: self.enabled,
            display_name: self.display_name,
            devices: self.devices,
            device_labels: self.device_labels,
            project_labels: self.project_labels,
            trigger: self.trigger.into(),
            escalation_levels: self.escalation_levels.into_iter().map(Into::into).collect(),
            schedule: self.schedule,
            trigger_delay: self.trigger_delay,
            reminder_notification: self.reminder_notification,
            resolved_notification: self.resolved_notification,
            unacknowledges_after: self.unacknowledges_after,
            actions: self.actions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Check the configured attributes of a notification rule.
pub fn validate(config: Value) -> Vec<Diagnostic> {
    let state: NotificationRuleState = match decode_state(config) {
        Ok(state) => state,
        Err(e) => return vec![Diagnostic::from(&e)],
    };

    let mut diagnostics = Vec::new();
    if Parent::parse(&state.parent).is_err() {
        diagnostics.push(
            Diagnostic::error("Invalid parent")
                .with_detail(r#"parent must be "projects/{id}" or "organizations/{id}""#)
                .with_attribute("parent"),
        );
    }
    if state.display_name.is_empty() {
        diagnostics.push(
            Diagnostic::error("Display name is required").with_attribute("display_name"),
        );
    }
    if state.trigger.field.is_empty() {
        diagnostics.push(
            Diagnostic::error("Trigger field is required").with_attribute("trigger.field"),
        );
    }
    for (i, level) in state.escalation_levels.iter().enumerate() {
        for (j, action) in level.actions.iter().enumerate() {
            if action.action_type.is_empty() {
                diagnostics.push(
                    Diagnostic::error("Action type is required").with_attribute(format!(
                        "escalation_levels.{}.actions.{}.type",
                        i, j
                    )),
                );
            }
        }
    }
    diagnostics
}

pub(crate) async fn create(client: &Client, planned_state: Value) -> Result<Value> {
    let plan: NotificationRuleState = decode_state(planned_state)?;
    let parent = Parent::parse(&plan.parent)?;
    let created = client
        .create_notification_rule(&parent, &plan.into_rule())
        .await?;
    encode_state(&NotificationRuleState::from_rule(created)?)
}

pub(crate) async fn read(client: &Client, current_state: Value) -> Result<Value> {
    let state: NotificationRuleState = decode_state(current_state)?;
    let rule = client.get_notification_rule(&state.name).await?;
    encode_state(&NotificationRuleState::from_rule(rule)?)
}

pub(crate) async fn update(
    client: &Client,
    prior_state: Value,
    planned_state: Value,
) -> Result<Value> {
    let prior: NotificationRuleState = decode_state(prior_state)?;
    let mut plan: NotificationRuleState = decode_state(planned_state)?;
    if plan.name.is_empty() {
        plan.name = prior.name;
    }
    if plan.name.is_empty() {
        return Err(Error::Validation(
            "notification rule has no name in state".to_string(),
        ));
    }

    let updated = client.update_notification_rule(&plan.into_rule()).await?;
    encode_state(&NotificationRuleState::from_rule(updated)?)
}

pub(crate) async fn delete(client: &Client, current_state: Value) -> Result<()> {
    let state: NotificationRuleState = decode_state(current_state)?;
    client.delete_notification_rule(&state.name).await
}
