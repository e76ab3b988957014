use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Base URL used when `RCA_API_URL` is not set (local development service).
pub const DEFAULT_API_URL: &str = "http://localhost:7071/api";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
    pub export: ExportConfig,
}

/// Diagnostics service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
///
/// The workflow itself never times a submission out; a timeout here is
/// enforced by the transport only.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub timeout_ms: Option<u64>,
}

/// Report export configuration
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = env::var("RCA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let service = ServiceConfig::new(base_url)?;

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms: &u64| *ms > 0),
        };

        let export = ExportConfig {
            directory: PathBuf::from(
                env::var("RCA_EXPORT_DIR").unwrap_or_else(|_| "./reports".to_string()),
            ),
        };

        Ok(Config {
            service,
            logging,
            request,
            export,
        })
    }
}

impl ServiceConfig {
    /// Build a service config, normalising the trailing slash.
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');

        if trimmed.is_empty() {
            return Err(AppError::Config {
                message: "RCA_API_URL must not be empty".to_string(),
            });
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(AppError::Config {
                message: format!("RCA_API_URL must be an http(s) URL, got '{}'", trimmed),
            });
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./reports"),
        }
    }
}
