//! End-to-end workflow tests
//!
//! Drives the controller against a wiremock diagnostics service, covering
//! the operator scenarios from form entry through rendering and export.

use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use network_rca_client::config::{RequestConfig, ServiceConfig};
use network_rca_client::diagnostics::DiagnosticsClient;
use network_rca_client::error::GENERIC_FAILURE_MESSAGE;
use network_rca_client::export::ReportFormat;
use network_rca_client::form::FormField;
use network_rca_client::render::{
    render_result, ConfidenceTier, SectionVisibility, StatusClass,
};
use network_rca_client::{SubmitOutcome, WorkflowController};

fn controller_for(base_url: &str) -> WorkflowController<DiagnosticsClient> {
    let config = ServiceConfig::new(base_url).expect("valid base url");
    let client = DiagnosticsClient::new(&config, RequestConfig::default()).expect("client");
    WorkflowController::new(client)
}

fn healthy_body() -> Value {
    json!({
        "target": "google.com",
        "diagnostics": [
            {"test_name": "DNS_RESOLUTION", "status": "PASS", "latency_ms": 10.0}
        ],
        "ai_analysis": {
            "confidence_percentage": 92,
            "root_cause": "No issues detected",
            "reasoning": "All tests passed"
        },
        "rca_report": "TECHNICAL REPORT",
        "executive_report": "EXECUTIVE REPORT",
        "technical_report": {
            "report_metadata": {"target": "google.com", "version": "2.0"},
            "diagnostic_results": [{"test": "DNS_RESOLUTION", "status": "PASS"}],
            "ai_analysis": {"confidence_percentage": 92, "evidence": []}
        }
    })
}

#[cfg(test)]
mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_plain_target_without_enterprise_context() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .and(body_json(json!({"target": "google.com", "service_type": "web"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(healthy_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));
        controller.set_field(FormField::Target, "google.com").unwrap();

        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);
        assert!(!controller.is_busy());

        let result = controller.results().unwrap();
        assert!(!SectionVisibility::for_result(&result).incident_context);
        assert!(!render_result(&result).contains("Incident Context"));
    }

    #[tokio::test]
    async fn test_empty_target_makes_no_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(healthy_body()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));

        let outcome = controller.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert_eq!(
            controller.error().as_deref(),
            Some("Please enter a domain or IP address")
        );
    }

    #[tokio::test]
    async fn test_enterprise_context_included() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .and(body_json(json!({
                "target": "shop.example.com",
                "service_type": "web",
                "incident_detection_type": "User-Reported",
                "affected_users_count": 500,
                "business_criticality": "High",
                "recent_firewall_change": false,
                "recent_dns_change": false,
                "recent_deployment": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(healthy_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));
        controller.set_field(FormField::Target, "shop.example.com ").unwrap();
        controller.toggle_enterprise();
        controller.set_field(FormField::AffectedUsersCount, "500").unwrap();
        controller.set_field(FormField::BusinessCriticality, "High").unwrap();

        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_failed_probe_renders_low_confidence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "diagnostics": [
                    {"test_name": "dns_lookup", "status": "FAIL", "latency_ms": 0, "failure_reason": "NXDOMAIN"}
                ],
                "ai_analysis": {
                    "confidence_percentage": 45,
                    "root_cause": "DNS resolution failure",
                    "reasoning": "The domain has no records"
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));
        controller.set_field(FormField::Target, "nosuch.example").unwrap();
        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);

        let result = controller.results().unwrap();
        let class = StatusClass::classify(&result.diagnostics[0].status);
        assert_eq!(class.icon(), "✗");
        assert_eq!(class, StatusClass::Fail);
        assert_eq!(
            ConfidenceTier::from_percentage(result.ai_analysis.confidence_percentage),
            ConfidenceTier::Low
        );
        assert_eq!(result.target, "nosuch.example");
        assert!(render_result(&result).contains("[LOW]"));
    }

    #[tokio::test]
    async fn test_unreachable_service_shows_fallback() {
        let controller = controller_for("http://127.0.0.1:1/api");
        controller.set_field(FormField::Target, "google.com").unwrap();

        let outcome = controller.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: GENERIC_FAILURE_MESSAGE.to_string()
            }
        );
        assert_eq!(controller.error().as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_service_error_shown_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Internal server error",
                "details": "openai quota exceeded",
                "status": "error"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));
        controller.set_field(FormField::Target, "google.com").unwrap();
        controller.submit().await;

        assert_eq!(controller.error().as_deref(), Some("Internal server error"));
        assert!(controller.results().is_none());
        assert!(!controller.is_busy());
    }
}

#[cfg(test)]
mod concurrency_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_dropped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(healthy_body())
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = Arc::new(controller_for(&format!("{}/api", mock_server.uri())));
        controller.set_field(FormField::Target, "google.com").unwrap();

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit().await })
        };

        while !controller.is_busy() {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.submit().await, SubmitOutcome::Ignored);
        assert_eq!(first.await.unwrap(), SubmitOutcome::Succeeded);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_sequential_submissions_replace_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(healthy_body()))
            .expect(2)
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));
        controller.set_field(FormField::Target, "google.com").unwrap();

        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);
        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);
        assert!(controller.results().is_some());
    }
}

#[cfg(test)]
mod export_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_json_export_round_trips() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(healthy_body()))
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));
        controller.set_field(FormField::Target, "google.com").unwrap();
        controller.submit().await;

        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let file = controller
            .export_on(ReportFormat::Json, date)
            .unwrap()
            .expect("result is held");

        assert_eq!(file.filename, "rca_technical_google.com_2026-10-19.json");
        let parsed: Value = serde_json::from_str(&file.content).unwrap();
        assert_eq!(parsed, healthy_body()["technical_report"]);
    }

    #[tokio::test]
    async fn test_all_formats_written_to_disk() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(healthy_body()))
            .mount(&mock_server)
            .await;

        let controller = controller_for(&format!("{}/api", mock_server.uri()));
        controller.set_field(FormField::Target, "google.com").unwrap();
        controller.submit().await;

        let dir = tempfile::tempdir().unwrap();
        let mut written = Vec::new();
        for format in ReportFormat::ALL {
            let file = controller.export(format).unwrap().unwrap();
            written.push(file.write_to(dir.path()).unwrap());
        }

        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));
        assert_eq!(
            std::fs::read_to_string(&written[1]).unwrap(),
            "EXECUTIVE REPORT"
        );
    }

    #[test]
    fn test_export_without_result() {
        let controller = controller_for("http://localhost:7071/api");
        assert!(controller.export(ReportFormat::Technical).unwrap().is_none());
    }
}
