use thiserror::Error;

use crate::export::ReportFormat;

/// Message shown when the service fails without supplying its own explanation.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to run diagnostics. Please try again.";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Diagnostics service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local, pre-flight input errors. Never leave the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a domain or IP address")]
    EmptyTarget,

    #[error("Affected users must be a whole number of zero or more, got '{value}'")]
    InvalidAffectedUsers { value: String },

    #[error("Invalid value for {field}: '{value}' (expected one of: {expected})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown field: {name}")]
    UnknownField { name: String },

    #[error("Target cannot be changed while diagnostics are running")]
    TargetLocked,
}

/// Remote call failures
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Service error: {status} - {}", .message.as_deref().unwrap_or("no error message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ServiceError {
    /// Human-readable message for the operator.
    ///
    /// Only the service's own `error` string is surfaced verbatim; every other
    /// failure collapses to [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Report export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Result has no {format} report body")]
    MissingReport { format: ReportFormat },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for diagnostics service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for report exports
pub type ExportResult<T> = Result<T, ExportError>;
