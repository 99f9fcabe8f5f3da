//! stepflow-core: the static side of a multi-step form wizard.
//!
//! A wizard is a set of steps (pages), each collecting a list of fields and
//! pointing at its successor through a `next` pointer and an ordered list of
//! conditional forks. This crate loads that configuration, validates it, and
//! builds the directed step graph once at startup.
//!
//! # Public API
//!
//! - [`Wizard`] -- validated configuration plus its [`StepGraph`]
//! - [`StepDefinition`], [`Fork`], [`Condition`] -- per-step configuration
//! - [`NavigationRequest`] -- the per-request input to navigation decisions
//! - [`PredicateRegistry`] -- named predicates referenced from config JSON
//! - [`ConfigError`] -- every configuration defect, surfaced at load or
//!   traversal time

pub mod condition;
pub mod config;
pub mod error;
pub mod graph;
pub mod types;
pub mod wizard;

// ── Convenience re-exports ───────────────────────────────────────────

pub use condition::{Condition, NamedPredicate, PredicateRegistry};
pub use config::{RawFork, RawStep, RawWizardConfig};
pub use error::ConfigError;
pub use graph::StepGraph;
pub use types::{
    mount, Action, ClearSession, FormValues, Fork, NavigationRequest, StepDefinition,
    EDIT_SUFFIX,
};
pub use wizard::{Wizard, DEFAULT_CONFIRM_STEP};
