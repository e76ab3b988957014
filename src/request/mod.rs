//! Request builder.
//!
//! Turns the input model into a [`DiagnosticRequest`]. Enterprise fields are
//! gated as a group by the section's visibility flag, then each one is included
//! according to [`ENTERPRISE_RULES`]. Collapsing the section excludes its
//! values from the next submission without clearing them from the form.

use crate::diagnostics::DiagnosticRequest;
use crate::error::ValidationError;
use crate::form::{FormField, InputModel};

/// When a visible enterprise field is copied into the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Always sent; the field has a default.
    Always,
    /// Sent only when the operator entered something.
    WhenNonEmpty,
}

/// One row of the inclusion table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionRule {
    pub field: FormField,
    pub inclusion: Inclusion,
}

/// Inclusion rules for the enterprise section, evaluated in order.
pub const ENTERPRISE_RULES: [InclusionRule; 7] = [
    InclusionRule {
        field: FormField::IncidentStartTime,
        inclusion: Inclusion::WhenNonEmpty,
    },
    InclusionRule {
        field: FormField::IncidentDetectionType,
        inclusion: Inclusion::Always,
    },
    InclusionRule {
        field: FormField::AffectedUsersCount,
        inclusion: Inclusion::WhenNonEmpty,
    },
    InclusionRule {
        field: FormField::BusinessCriticality,
        inclusion: Inclusion::Always,
    },
    InclusionRule {
        field: FormField::RecentFirewallChange,
        inclusion: Inclusion::Always,
    },
    InclusionRule {
        field: FormField::RecentDnsChange,
        inclusion: Inclusion::Always,
    },
    InclusionRule {
        field: FormField::RecentDeployment,
        inclusion: Inclusion::Always,
    },
];

/// Build the request for the current form state.
///
/// Fails before any network activity when the trimmed target is empty or the
/// affected-users text is not a non-negative whole number.
pub fn build_request(form: &InputModel) -> Result<DiagnosticRequest, ValidationError> {
    let target = form.target.trim();
    if target.is_empty() {
        return Err(ValidationError::EmptyTarget);
    }

    let mut request = DiagnosticRequest::new(target);
    if !form.show_enterprise_inputs {
        return Ok(request);
    }

    for rule in &ENTERPRISE_RULES {
        if rule.inclusion == Inclusion::WhenNonEmpty
            && form.field_text(rule.field).trim().is_empty()
        {
            continue;
        }
        apply_field(&mut request, form, rule.field)?;
    }

    Ok(request)
}

fn apply_field(
    request: &mut DiagnosticRequest,
    form: &InputModel,
    field: FormField,
) -> Result<(), ValidationError> {
    match field {
        FormField::Target => {}
        FormField::IncidentStartTime => {
            request.incident_start_time = Some(form.incident_start_time.trim().to_string())
        }
        FormField::IncidentDetectionType => {
            request.incident_detection_type = Some(form.incident_detection_type)
        }
        FormField::AffectedUsersCount => {
            request.affected_users_count = Some(parse_user_count(&form.affected_users_count)?)
        }
        FormField::BusinessCriticality => {
            request.business_criticality = Some(form.business_criticality)
        }
        FormField::RecentFirewallChange => {
            request.recent_firewall_change = Some(form.recent_firewall_change)
        }
        FormField::RecentDnsChange => request.recent_dns_change = Some(form.recent_dns_change),
        FormField::RecentDeployment => request.recent_deployment = Some(form.recent_deployment),
    }
    Ok(())
}

fn parse_user_count(text: &str) -> Result<u64, ValidationError> {
    let trimmed = text.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidAffectedUsers {
            value: trimmed.to_string(),
        })
}
