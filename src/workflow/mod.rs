//! Diagnostic workflow: serializable session state and the submission controller.
//!
//! `WorkflowState` holds the form, the phase, the last result and the last
//! error, and exposes one synchronous transition per event. The controller
//! wraps it around the single asynchronous call to the diagnostics service:
//!
//! ```text
//! Idle --submit--> Submitting --ok--> Success --settle--> Idle
//!                       \----err---> Failure --settle--> Idle
//! ```

mod controller;
mod state;

pub use controller::*;
pub use state::*;
