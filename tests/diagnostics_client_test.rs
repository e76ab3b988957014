//! Integration tests for the diagnostics client
//!
//! Tests HTTP client behavior using wiremock for request/response mocking.

use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use network_rca_client::config::{RequestConfig, ServiceConfig};
use network_rca_client::diagnostics::{
    BusinessCriticality, DiagnosticRequest, DiagnosticsClient, DiagnosticsService,
};
use network_rca_client::error::{ServiceError, GENERIC_FAILURE_MESSAGE};

/// Create a test client pointing to mock server
fn create_test_client(base_url: &str) -> DiagnosticsClient {
    let config = ServiceConfig::new(format!("{}/api", base_url)).expect("valid base url");
    DiagnosticsClient::new(&config, RequestConfig::default()).expect("Failed to create client")
}

fn success_body() -> serde_json::Value {
    json!({
        "target": "google.com",
        "timestamp": "2026-10-19T08:00:00",
        "diagnostics": [
            {"test_name": "DNS_RESOLUTION", "status": "PASS", "latency_ms": 12.4},
            {"test_name": "TCP_CONNECTIVITY", "status": "PASS", "latency_ms": 20.1},
            {"test_name": "HTTP_RESPONSE", "status": "PASS", "latency_ms": 88.0}
        ],
        "ai_analysis": {
            "root_cause": "No issues detected; all tests passed successfully",
            "confidence_percentage": 95,
            "reasoning": "All diagnostic tests passed.",
            "evidence": ["DNS resolved", "TCP connected"],
            "remediation_steps": ["No action required - system is healthy"],
            "severity": "INFO"
        },
        "rca_report": "NETWORK RCA REPORT",
        "executive_report": "EXECUTIVE SUMMARY",
        "technical_report": {"report_metadata": {"target": "google.com"}},
        "status": "success"
    })
}

#[cfg(test)]
mod diagnose_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_diagnose() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"target": "google.com", "service_type": "web"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client.diagnose(&DiagnosticRequest::new("google.com")).await;

        assert!(result.is_ok(), "Diagnose should succeed: {:?}", result.err());
        let result = result.unwrap();
        assert_eq!(result.target, "google.com");
        assert_eq!(result.diagnostics.len(), 3);
        assert_eq!(result.ai_analysis.confidence_percentage, 95.0);
        assert_eq!(result.rca_report.as_deref(), Some("NETWORK RCA REPORT"));
    }

    #[tokio::test]
    async fn test_enterprise_body_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .and(body_json(json!({
                "target": "10.1.2.3",
                "service_type": "web",
                "affected_users_count": 500,
                "business_criticality": "High"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut request = DiagnosticRequest::new("10.1.2.3");
        request.affected_users_count = Some(500);
        request.business_criticality = Some(BusinessCriticality::High);

        let client = create_test_client(&mock_server.uri());
        assert!(client.diagnose(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_null_analysis_lists_accepted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "diagnostics": [
                    {"test_name": "DNS_RESOLUTION", "status": "FAIL", "latency_ms": 0, "failure_reason": "NXDOMAIN"}
                ],
                "ai_analysis": {
                    "confidence_percentage": 45,
                    "root_cause": "DNS",
                    "reasoning": null,
                    "evidence": null,
                    "remediation_steps": null
                }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let result = client
            .diagnose(&DiagnosticRequest::new("nosuch.example"))
            .await
            .expect("null lists should not reject the result");

        assert_eq!(result.ai_analysis.root_cause, "DNS");
        assert!(result.ai_analysis.evidence.is_empty());
        assert!(result.ai_analysis.remediation_steps.is_empty());
    }

    #[tokio::test]
    async fn test_service_error_message_extracted() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "Missing 'target' parameter",
                "status": "validation_error"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let err = client
            .diagnose(&DiagnosticRequest::new("google.com"))
            .await
            .unwrap_err();

        match &err {
            ServiceError::Api { status, message } => {
                assert_eq!(*status, 400);
                assert_eq!(message.as_deref(), Some("Missing 'target' parameter"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
        assert_eq!(err.user_message(), "Missing 'target' parameter");
    }

    #[tokio::test]
    async fn test_server_error_without_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let err = client
            .diagnose(&DiagnosticRequest::new("google.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Api { status: 502, message: None }));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let err = client
            .diagnose(&DiagnosticRequest::new("google.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidResponse { .. }));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let config = ServiceConfig::new("http://127.0.0.1:1/api").unwrap();
        let client = DiagnosticsClient::new(&config, RequestConfig::default()).unwrap();

        let err = client
            .diagnose(&DiagnosticRequest::new("google.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_transport_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/diagnose"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body())
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = ServiceConfig::new(format!("{}/api", mock_server.uri())).unwrap();
        let request_config = RequestConfig {
            timeout_ms: Some(50),
        };
        let client = DiagnosticsClient::new(&config, request_config).unwrap();

        let err = client
            .diagnose(&DiagnosticRequest::new("google.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Timeout { timeout_ms: 50 }));
    }
}
