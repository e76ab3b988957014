use chrono::{NaiveDate, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::state::{BeginRefusal, WorkflowState};
use crate::diagnostics::{DiagnosticResult, DiagnosticsService};
use crate::error::{ExportResult, ValidationError};
use crate::export::{export_report, ReportFile, ReportFormat};
use crate::form::FormField;

/// What a call to [`WorkflowController::submit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service returned a result, now held in state.
    Succeeded,
    /// The call failed; the message is held in state.
    Failed { message: String },
    /// Pre-flight validation failed; no request was sent.
    Rejected(ValidationError),
    /// A submission was already in flight; this attempt was dropped.
    Ignored,
}

/// Drives one operator session against a diagnostics service.
///
/// The state lock is never held across the network call, so state can be
/// inspected (and re-entrant submits refused) while a request is in flight.
pub struct WorkflowController<S> {
    service: S,
    state: Mutex<WorkflowState>,
}

impl<S: DiagnosticsService> WorkflowController<S> {
    /// Create a controller with a fresh session.
    pub fn new(service: S) -> Self {
        Self::with_state(service, WorkflowState::new())
    }

    /// Create a controller resuming an existing state.
    ///
    /// A state captured mid-submission has no request behind it, so it is settled first.
    pub fn with_state(service: S, mut state: WorkflowState) -> Self {
        state.settle();
        Self {
            service,
            state: Mutex::new(state),
        }
    }

    /// The service this controller submits to.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> WorkflowState {
        self.lock().clone()
    }

    /// Busy flag: true while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    /// Current result, if any.
    pub fn results(&self) -> Option<DiagnosticResult> {
        self.lock().results.clone()
    }

    /// Current error message, if any.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Edit a form field.
    pub fn set_field(&self, field: FormField, value: &str) -> Result<(), ValidationError> {
        self.lock().set_field(field, value)
    }

    /// Open or collapse the enterprise section.
    pub fn toggle_enterprise(&self) -> bool {
        self.lock().toggle_enterprise()
    }

    /// Run one diagnostic round trip.
    ///
    /// The busy flag is cleared by a drop guard, so it is reset after success,
    /// failure, a panicking service, or a dropped future.
    pub async fn submit(&self) -> SubmitOutcome {
        let request = match self.lock().begin_submission() {
            Ok(request) => request,
            Err(BeginRefusal::Busy) => {
                warn!("Submission already in flight, ignoring");
                return SubmitOutcome::Ignored;
            }
            Err(BeginRefusal::Invalid(e)) => {
                info!(error = %e, "Submission rejected by validation");
                return SubmitOutcome::Rejected(e);
            }
        };

        let _settle = SettleOnDrop { state: &self.state };
        let submission_id = Uuid::new_v4();
        let start = Instant::now();

        info!(
            submission_id = %submission_id,
            target_host = %request.target,
            enterprise = request.has_enterprise_context(),
            "Running diagnostics"
        );

        match self.service.diagnose(&request).await {
            Ok(result) => {
                info!(
                    submission_id = %submission_id,
                    tests = result.diagnostics.len(),
                    confidence = result.ai_analysis.confidence_percentage,
                    latency_ms = start.elapsed().as_millis(),
                    "Diagnostics completed"
                );
                self.lock().complete_success(&request, result);
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                let message = e.user_message();
                warn!(
                    submission_id = %submission_id,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "Diagnostics failed"
                );
                self.lock().complete_failure(message.clone());
                SubmitOutcome::Failed { message }
            }
        }
    }

    /// Export the current result in `format`, dated today (UTC).
    ///
    /// Returns `Ok(None)` when no result is held.
    pub fn export(&self, format: ReportFormat) -> ExportResult<Option<ReportFile>> {
        self.export_on(format, Utc::now().date_naive())
    }

    /// Export the current result in `format` with an explicit date.
    pub fn export_on(&self, format: ReportFormat, date: NaiveDate) -> ExportResult<Option<ReportFile>> {
        let state = self.lock();
        let Some(result) = state.results.as_ref() else {
            debug!(format = %format, "No result to export");
            return Ok(None);
        };

        let file = export_report(result, format, date)?;
        info!(format = %format, filename = %file.filename, "Report exported");
        Ok(Some(file))
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        lock_state(&self.state)
    }
}

/// Finalizer that settles the workflow back to idle.
struct SettleOnDrop<'a> {
    state: &'a Mutex<WorkflowState>,
}

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        lock_state(self.state).settle();
    }
}

fn lock_state(state: &Mutex<WorkflowState>) -> MutexGuard<'_, WorkflowState> {
    // A panic elsewhere must not leave the session permanently unusable.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
