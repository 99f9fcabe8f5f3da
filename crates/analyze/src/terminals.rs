//! Steps with no `next` pointer.
//!
//! Reaching one of these ends the journey: the host has nowhere linear to
//! go and, unless the step sets `clearSession: false`, the session is
//! cleared when it renders. That is usually intended for the final page
//! but worth surfacing everywhere else.

use std::collections::BTreeMap;

use serde::Serialize;
use stepflow_core::{ClearSession, Wizard};

#[derive(Debug, Clone, Serialize)]
pub struct TerminalStep {
    pub step: String,
    /// Forks that may still lead somewhere when they match.
    pub fork_count: usize,
    pub clears_session: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalResult {
    /// Keyed by step id for deterministic output.
    pub steps: BTreeMap<String, TerminalStep>,
}

pub fn analyze_terminals(wizard: &Wizard) -> TerminalResult {
    let steps = wizard
        .steps()
        .iter()
        .filter(|step| step.next.is_none() && step.id != wizard.confirm_step())
        .map(|step| {
            (
                step.id.clone(),
                TerminalStep {
                    step: step.id.clone(),
                    fork_count: step.forks.len(),
                    clears_session: step.clear_session != ClearSession::False,
                },
            )
        })
        .collect();

    TerminalResult { steps }
}
