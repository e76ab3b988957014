use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// The only service profile this client submits.
pub const SERVICE_TYPE_WEB: &str = "web";

/// How the incident was first noticed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionType {
    #[default]
    #[serde(rename = "User-Reported")]
    UserReported,
    #[serde(rename = "System-Detected")]
    SystemDetected,
}

impl DetectionType {
    /// Convert to the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionType::UserReported => "User-Reported",
            DetectionType::SystemDetected => "System-Detected",
        }
    }
}

impl std::fmt::Display for DetectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DetectionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user-reported" | "user" => Ok(DetectionType::UserReported),
            "system-detected" | "system" => Ok(DetectionType::SystemDetected),
            _ => Err(ValidationError::InvalidChoice {
                field: "incident_detection_type",
                value: s.to_string(),
                expected: "User-Reported, System-Detected",
            }),
        }
    }
}

/// Business impact level of the incident
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessCriticality {
    Low,
    #[default]
    Medium,
    High,
}

impl BusinessCriticality {
    /// Convert to the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessCriticality::Low => "Low",
            BusinessCriticality::Medium => "Medium",
            BusinessCriticality::High => "High",
        }
    }
}

impl std::fmt::Display for BusinessCriticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BusinessCriticality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(BusinessCriticality::Low),
            "medium" => Ok(BusinessCriticality::Medium),
            "high" => Ok(BusinessCriticality::High),
            _ => Err(ValidationError::InvalidChoice {
                field: "business_criticality",
                value: s.to_string(),
                expected: "Low, Medium, High",
            }),
        }
    }
}

/// Body of `POST {base_url}/diagnose`
///
/// Every optional field is skipped on the wire when unset, so a request built
/// without incident context serializes to just `target` and `service_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRequest {
    pub target: String,
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_detection_type: Option<DetectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_users_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_criticality: Option<BusinessCriticality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_firewall_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_dns_change: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_deployment: Option<bool>,
}

impl DiagnosticRequest {
    /// Create a bare request for an already-trimmed target.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            service_type: SERVICE_TYPE_WEB.to_string(),
            incident_start_time: None,
            incident_detection_type: None,
            affected_users_count: None,
            business_criticality: None,
            recent_firewall_change: None,
            recent_dns_change: None,
            recent_deployment: None,
        }
    }

    /// Whether any enterprise field is set.
    pub fn has_enterprise_context(&self) -> bool {
        self.incident_start_time.is_some()
            || self.incident_detection_type.is_some()
            || self.affected_users_count.is_some()
            || self.business_criticality.is_some()
            || self.recent_firewall_change.is_some()
            || self.recent_dns_change.is_some()
            || self.recent_deployment.is_some()
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Successful `/diagnose` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub diagnostics: Vec<DiagnosticTest>,
    pub ai_analysis: AiAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_context: Option<IncidentContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_changes: Option<RecentChanges>,
    /// Plain-text technical report. Opaque; exported, never parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rca_report: Option<String>,
    /// Plain-text executive summary. Opaque; exported, never parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_report: Option<String>,
    /// Machine-readable technical report. Opaque; exported, never parsed.
    #[serde(default)]
    pub technical_report: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_urls: Option<ReportUrls>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A single network probe outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticTest {
    pub test_name: String,
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latency_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl DiagnosticTest {
    /// Test name with underscores shown as spaces.
    pub fn display_name(&self) -> String {
        self.test_name.replace('_', " ")
    }
}

/// AI root-cause analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_percentage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub root_cause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibility_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_correlation: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remediation_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Incident metadata as echoed back by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentContext {
    #[serde(default)]
    pub incident_start_time: Option<String>,
    #[serde(default)]
    pub incident_detection_type: Option<String>,
    #[serde(default)]
    pub affected_users_count: Option<u64>,
    #[serde(default)]
    pub business_criticality: Option<String>,
}

/// Recent-change flags as echoed back by the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentChanges {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_firewall_change: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_dns_change: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_deployment: bool,
}

/// Storage locations the service may report for its copies of the reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUrls {
    #[serde(default)]
    pub technical_text: Option<String>,
    #[serde(default)]
    pub executive_summary: Option<String>,
    #[serde(default)]
    pub machine_readable_json: Option<String>,
}

/// Failure body returned by the service on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ServiceErrorBody {
    /// The `error` field, only when it is a non-empty string.
    pub fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
