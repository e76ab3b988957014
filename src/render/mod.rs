//! Result presentation.
//!
//! Total classification functions over response data, section visibility
//! rules, and a plain-text rendering of a [`DiagnosticResult`] for the console.

use crate::diagnostics::{DiagnosticResult, DiagnosticTest, IncidentContext, RecentChanges};

/// Outcome class of a single diagnostic test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Pass,
    Fail,
    /// Anything that is neither PASS nor FAIL
    Warn,
}

impl StatusClass {
    /// Classify a raw test status. Matching is exact.
    pub fn classify(status: &str) -> Self {
        match status {
            "PASS" => StatusClass::Pass,
            "FAIL" => StatusClass::Fail,
            _ => StatusClass::Warn,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StatusClass::Pass => "✓",
            StatusClass::Fail => "✗",
            StatusClass::Warn => "⚠",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StatusClass::Pass => "status-pass",
            StatusClass::Fail => "status-fail",
            StatusClass::Warn => "status-warn",
        }
    }
}

/// Severity of the analysed incident
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityClass {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl SeverityClass {
    /// Classify a raw severity; unknown values fall back to `Medium`.
    pub fn classify(severity: &str) -> Self {
        match severity {
            "CRITICAL" => SeverityClass::Critical,
            "HIGH" => SeverityClass::High,
            "MEDIUM" => SeverityClass::Medium,
            "LOW" => SeverityClass::Low,
            "INFO" => SeverityClass::Info,
            _ => SeverityClass::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityClass::Critical => "CRITICAL",
            SeverityClass::High => "HIGH",
            SeverityClass::Medium => "MEDIUM",
            SeverityClass::Low => "LOW",
            SeverityClass::Info => "INFO",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SeverityClass::Critical => "severity-critical",
            SeverityClass::High => "severity-high",
            SeverityClass::Medium => "severity-medium",
            SeverityClass::Low => "severity-low",
            SeverityClass::Info => "severity-info",
        }
    }
}

/// Confidence badge tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// `>= 80` is HIGH, `60..80` is MEDIUM, everything else (including NaN) is LOW.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ConfidenceTier::High
        } else if percentage >= 60.0 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "HIGH",
            ConfidenceTier::Medium => "MEDIUM",
            ConfidenceTier::Low => "LOW",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "confidence-high",
            ConfidenceTier::Medium => "confidence-medium",
            ConfidenceTier::Low => "confidence-low",
        }
    }
}

/// Confidence badge plus bar fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceMeter {
    pub percentage: f64,
    pub tier: ConfidenceTier,
    /// Bar width in percent: the raw value, held to `0..=100`.
    pub fill_percent: f64,
}

impl ConfidenceMeter {
    pub fn new(percentage: f64) -> Self {
        let fill_percent = if percentage.is_nan() {
            0.0
        } else {
            percentage.clamp(0.0, 100.0)
        };
        Self {
            percentage,
            tier: ConfidenceTier::from_percentage(percentage),
            fill_percent,
        }
    }
}

/// Which optional result blocks are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionVisibility {
    pub incident_context: bool,
    pub recent_changes: bool,
    pub responsibility: bool,
    pub change_correlation: bool,
    pub evidence: bool,
    pub remediation: bool,
}

impl SectionVisibility {
    pub fn for_result(result: &DiagnosticResult) -> Self {
        let analysis = &result.ai_analysis;
        Self {
            incident_context: result
                .incident_context
                .as_ref()
                .is_some_and(incident_context_present),
            recent_changes: result.recent_changes.as_ref().is_some_and(any_change),
            responsibility: non_blank(&analysis.root_cause_category),
            change_correlation: non_blank(&analysis.change_correlation),
            evidence: !analysis.evidence.is_empty(),
            remediation: !analysis.remediation_steps.is_empty(),
        }
    }
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn incident_context_present(context: &IncidentContext) -> bool {
    non_blank(&context.incident_start_time) || context.affected_users_count.unwrap_or(0) > 0
}

fn any_change(changes: &RecentChanges) -> bool {
    changes.recent_firewall_change || changes.recent_dns_change || changes.recent_deployment
}

/// Badges for each recent change that is flagged.
pub fn change_badges(changes: &RecentChanges) -> Vec<&'static str> {
    [
        (changes.recent_firewall_change, "Firewall Update"),
        (changes.recent_dns_change, "DNS Change"),
        (changes.recent_deployment, "Deployment"),
    ]
    .into_iter()
    .filter_map(|(flagged, badge)| flagged.then_some(badge))
    .collect()
}

/// One line per test: icon, name, status, latency, and the failure reason if any.
pub fn render_test(test: &DiagnosticTest) -> String {
    let class = StatusClass::classify(&test.status);
    let mut line = format!(
        "{} {} [{}] {} ms",
        class.icon(),
        test.display_name(),
        test.status,
        test.latency_ms
    );
    if let Some(reason) = test.failure_reason.as_deref().filter(|r| !r.is_empty()) {
        line.push_str(&format!(" - Reason: {}", reason));
    }
    line
}

/// Plain-text view of a full result.
pub fn render_result(result: &DiagnosticResult) -> String {
    let visibility = SectionVisibility::for_result(result);
    let analysis = &result.ai_analysis;
    let mut lines: Vec<String> = Vec::new();

    if visibility.incident_context {
        if let Some(context) = &result.incident_context {
            lines.push("== Incident Context ==".to_string());
            if let Some(start) = context.incident_start_time.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("Incident Started: {}", start));
            }
            if let Some(detection) = &context.incident_detection_type {
                lines.push(format!("Detection Method: {}", detection));
            }
            if let Some(users) = context.affected_users_count.filter(|n| *n > 0) {
                lines.push(format!("Users Affected:   {}", users));
            }
            if let Some(criticality) = &context.business_criticality {
                lines.push(format!("Business Impact:  {}", criticality));
            }
            lines.push(String::new());
        }
    }

    if visibility.recent_changes {
        if let Some(changes) = &result.recent_changes {
            lines.push("== Recent Changes Detected ==".to_string());
            lines.push(change_badges(changes).join(", "));
            lines.push(String::new());
        }
    }

    lines.push("== Diagnostic Test Results ==".to_string());
    lines.extend(result.diagnostics.iter().map(render_test));
    lines.push(String::new());

    let meter = ConfidenceMeter::new(analysis.confidence_percentage);
    lines.push("== AI Root Cause Analysis ==".to_string());
    lines.push(format!(
        "Confidence: {}% [{}] {}",
        analysis.confidence_percentage,
        meter.tier.label(),
        confidence_bar(meter.fill_percent)
    ));
    if let Some(severity) = &analysis.severity {
        lines.push(format!("Severity: {}", SeverityClass::classify(severity).label()));
    }
    lines.push(format!("Root Cause: {}", analysis.root_cause));

    if visibility.responsibility {
        lines.push(format!(
            "Issue Category: {}",
            analysis.root_cause_category.as_deref().unwrap_or_default()
        ));
        if let Some(team) = &analysis.responsible_team {
            lines.push(format!("Responsible Team: {}", team));
        }
        if let Some(reason) = analysis.responsibility_reason.as_deref().filter(|r| !r.is_empty()) {
            lines.push(format!("Why this team? {}", reason));
        }
    }

    if visibility.change_correlation {
        lines.push(format!(
            "Change Impact: {}",
            analysis.change_correlation.as_deref().unwrap_or_default()
        ));
    }

    lines.push(format!("Analysis: {}", analysis.reasoning));

    if visibility.evidence {
        lines.push("Supporting Evidence:".to_string());
        lines.extend(analysis.evidence.iter().map(|item| format!("  - {}", item)));
    }

    if visibility.remediation {
        lines.push("Recommended Actions:".to_string());
        lines.extend(
            analysis
                .remediation_steps
                .iter()
                .enumerate()
                .map(|(index, step)| format!("  {}. {}", index + 1, step)),
        );
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn confidence_bar(fill_percent: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((fill_percent / 100.0) * WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}
