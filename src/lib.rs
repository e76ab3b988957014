//! # Network RCA Client
//!
//! Client-side workflow for a remote network diagnostic and AI root-cause
//! analysis service: an operator names a target, optionally adds incident
//! context, submits it, and gets back probe results, an AI analysis and
//! downloadable reports.
//!
//! ## Features
//!
//! - **Input Model**: target, optional incident context and recent-change flags
//! - **Request Builder**: table-driven inclusion of enterprise fields
//! - **Submission Controller**: guarded, single-flight submission with a finalizer
//!   that always clears the busy flag
//! - **Result Renderer**: status, severity and confidence classification
//! - **Report Exporter**: technical text, executive text and JSON reports
//!
//! ## Architecture
//!
//! ```text
//! InputModel → build_request → WorkflowController → POST {base_url}/diagnose
//!                                      ↓
//!                        render_result / export_report
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use network_rca_client::{Config, WorkflowController};
//! use network_rca_client::diagnostics::DiagnosticsClient;
//! use network_rca_client::form::FormField;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = DiagnosticsClient::new(&config.service, config.request.clone())?;
//!     let controller = WorkflowController::new(client);
//!     controller.set_field(FormField::Target, "google.com")?;
//!     controller.submit().await;
//!     Ok(())
//! }
//! ```

/// Configuration management.
pub mod config;
/// Interactive console front-end.
pub mod console;
/// Diagnostics service client and wire types.
pub mod diagnostics;
/// Error types and result aliases for the application.
pub mod error;
/// Report export.
pub mod export;
/// Operator input model.
pub mod form;
/// Result classification and text rendering.
pub mod render;
/// Request building from form state.
pub mod request;
/// Workflow state and submission controller.
pub mod workflow;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use workflow::{SubmitOutcome, WorkflowController, WorkflowState};
