//! Step-flow controller -- decides where a wizard goes next.
//!
//! Layers conditional branching, invalidation of superseded answers and
//! edit-mode redirects on top of a host framework's base controller:
//!
//! 1. [`fork::resolve_next_step`] picks the branch a submission takes
//! 2. [`edit`] returns edits to the confirmation step unless the branch
//!    changed
//! 3. [`invalidate`] clears the answers of the branch that was abandoned
//! 4. [`locals`] adds error counts and per-step summaries to the template
//!    context
//!
//! [`StepFlowController`] ties these together for one step.

pub mod base;
pub mod controller;
pub mod edit;
pub mod error;
pub mod fork;
pub mod invalidate;
pub mod locals;

pub use base::{BaseController, FieldError, FieldErrors, Locals, ResponseContext, WizardController};
pub use controller::StepFlowController;
pub use error::ControllerError;
pub use locals::{ErrorLength, StepSummary};
