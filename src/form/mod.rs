//! Operator input model.
//!
//! Holds the raw, user-editable form state: the target, the optional incident
//! context, the recent-change flags, and whether the enterprise section is open.
//! Values are kept the way the operator typed them; interpretation happens in
//! the request builder.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{BusinessCriticality, DetectionType};
use crate::error::ValidationError;

/// Addressable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Target,
    IncidentStartTime,
    IncidentDetectionType,
    AffectedUsersCount,
    BusinessCriticality,
    RecentFirewallChange,
    RecentDnsChange,
    RecentDeployment,
}

impl FormField {
    /// All fields, in form order.
    pub const ALL: [FormField; 8] = [
        FormField::Target,
        FormField::IncidentStartTime,
        FormField::IncidentDetectionType,
        FormField::AffectedUsersCount,
        FormField::BusinessCriticality,
        FormField::RecentFirewallChange,
        FormField::RecentDnsChange,
        FormField::RecentDeployment,
    ];

    /// Wire / console name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Target => "target",
            FormField::IncidentStartTime => "incident_start_time",
            FormField::IncidentDetectionType => "incident_detection_type",
            FormField::AffectedUsersCount => "affected_users_count",
            FormField::BusinessCriticality => "business_criticality",
            FormField::RecentFirewallChange => "recent_firewall_change",
            FormField::RecentDnsChange => "recent_dns_change",
            FormField::RecentDeployment => "recent_deployment",
        }
    }

    /// Whether the field belongs to the collapsible enterprise section.
    pub fn is_enterprise(&self) -> bool {
        !matches!(self, FormField::Target)
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FormField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace('-', "_");
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .or(match name.as_str() {
                "start" | "start_time" => Some(FormField::IncidentStartTime),
                "detection" | "detection_type" => Some(FormField::IncidentDetectionType),
                "users" | "affected_users" => Some(FormField::AffectedUsersCount),
                "criticality" | "impact" => Some(FormField::BusinessCriticality),
                "firewall" => Some(FormField::RecentFirewallChange),
                "dns" => Some(FormField::RecentDnsChange),
                "deployment" | "deploy" => Some(FormField::RecentDeployment),
                _ => None,
            })
            .ok_or_else(|| ValidationError::UnknownField {
                name: s.to_string(),
            })
    }
}

/// Mutable form state, created once per session and never reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputModel {
    pub target: String,
    pub incident_start_time: String,
    pub incident_detection_type: DetectionType,
    /// Raw text; parsed and validated when a request is built.
    pub affected_users_count: String,
    pub business_criticality: BusinessCriticality,
    pub recent_firewall_change: bool,
    pub recent_dns_change: bool,
    pub recent_deployment: bool,
    pub show_enterprise_inputs: bool,
}

impl InputModel {
    /// Create an empty form with default choices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the enterprise section open/closed. Field values are kept either way.
    pub fn toggle_enterprise(&mut self) -> bool {
        self.show_enterprise_inputs = !self.show_enterprise_inputs;
        self.show_enterprise_inputs
    }

    /// Apply one field edit from operator text.
    ///
    /// Choice and flag fields are parsed immediately; free-text fields are stored as typed.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        match field {
            FormField::Target => self.target = value.to_string(),
            FormField::IncidentStartTime => self.incident_start_time = value.trim().to_string(),
            FormField::IncidentDetectionType => self.incident_detection_type = value.parse()?,
            FormField::AffectedUsersCount => self.affected_users_count = value.trim().to_string(),
            FormField::BusinessCriticality => self.business_criticality = value.parse()?,
            FormField::RecentFirewallChange => {
                self.recent_firewall_change = parse_flag(field, value)?
            }
            FormField::RecentDnsChange => self.recent_dns_change = parse_flag(field, value)?,
            FormField::RecentDeployment => self.recent_deployment = parse_flag(field, value)?,
        }
        Ok(())
    }

    /// Current value of a field as text.
    pub fn field_text(&self, field: FormField) -> String {
        match field {
            FormField::Target => self.target.clone(),
            FormField::IncidentStartTime => self.incident_start_time.clone(),
            FormField::IncidentDetectionType => self.incident_detection_type.to_string(),
            FormField::AffectedUsersCount => self.affected_users_count.clone(),
            FormField::BusinessCriticality => self.business_criticality.to_string(),
            FormField::RecentFirewallChange => self.recent_firewall_change.to_string(),
            FormField::RecentDnsChange => self.recent_dns_change.to_string(),
            FormField::RecentDeployment => self.recent_deployment.to_string(),
        }
    }
}

fn parse_flag(field: FormField, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "y" => Ok(true),
        "false" | "no" | "off" | "0" | "n" => Ok(false),
        _ => Err(ValidationError::InvalidChoice {
            field: field.as_str(),
            value: value.to_string(),
            expected: "true, false",
        }),
    }
}
