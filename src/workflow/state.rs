use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticRequest, DiagnosticResult};
use crate::error::ValidationError;
use crate::form::{FormField, InputModel};
use crate::request::build_request;

/// Submission phase of the workflow.
///
/// Success and failure are momentary: both settle back to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Ready to accept a submission
    #[default]
    Idle,
    /// A request is in flight; submit and target edits are locked
    Submitting,
}

impl Phase {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a submission did not start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeginRefusal {
    /// Another submission is in flight; the attempt is dropped.
    Busy,
    /// The form failed pre-flight validation.
    Invalid(ValidationError),
}

/// Complete, serializable workflow state.
///
/// Every method is a synchronous transition; none of them perform I/O.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub input: InputModel,
    pub phase: Phase,
    pub results: Option<DiagnosticResult>,
    pub error: Option<String>,
}

impl WorkflowState {
    /// Create a fresh session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Edit a form field. The target is locked while busy.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        if field == FormField::Target && self.is_busy() {
            return Err(ValidationError::TargetLocked);
        }
        self.input.set_field(field, value)
    }

    /// Open or collapse the enterprise section; returns the new visibility.
    pub fn toggle_enterprise(&mut self) -> bool {
        self.input.toggle_enterprise()
    }

    /// `Idle -> Submitting`.
    ///
    /// Validation failures leave the phase and any previous result untouched and
    /// record the inline message in `error`.
    pub fn begin_submission(&mut self) -> Result<DiagnosticRequest, BeginRefusal> {
        if self.is_busy() {
            return Err(BeginRefusal::Busy);
        }

        match build_request(&self.input) {
            Ok(request) => {
                self.error = None;
                self.results = None;
                self.phase = Phase::Submitting;
                Ok(request)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(BeginRefusal::Invalid(e))
            }
        }
    }

    /// `Submitting -> Success`: store the result, replacing any earlier one.
    pub fn complete_success(&mut self, request: &DiagnosticRequest, mut result: DiagnosticResult) {
        if result.target.trim().is_empty() {
            result.target = request.target.clone();
        }
        self.error = None;
        self.results = Some(result);
    }

    /// `Submitting -> Failure`: store the operator-facing message.
    pub fn complete_failure(&mut self, message: impl Into<String>) {
        self.results = None;
        self.error = Some(message.into());
    }

    /// Back to `Idle`, whatever the outcome.
    pub fn settle(&mut self) {
        self.phase = Phase::Idle;
    }
}
