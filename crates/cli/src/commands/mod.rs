//! Subcommand implementations and the loading helpers they share.
//!
//! Every command reports failures through [`crate::report_error`] and
//! exits with status 1.

pub(crate) mod check;
pub(crate) mod invalidate;
pub(crate) mod next;
pub(crate) mod validate;

use std::collections::BTreeSet;
use std::path::Path;
use std::process;

use stepflow_core::config::RawCondition;
use stepflow_core::{PredicateRegistry, RawWizardConfig, Wizard};
use stepflow_session::{InMemorySession, SessionMutation};

use crate::{report_error, OutputFormat};

/// Read and parse a JSON file, exiting on failure.
pub(crate) fn read_json(path: &Path, output: OutputFormat, quiet: bool) -> serde_json::Value {
    let src = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&src) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Load a wizard configuration, exiting on any configuration error.
///
/// The CLI has no host code to supply predicates, so fork conditions that
/// name one are rejected unless `stub_predicates` is set, in which case
/// every referenced predicate is registered as never matching.
pub(crate) fn load_wizard(
    path: &Path,
    stub_predicates: bool,
    output: OutputFormat,
    quiet: bool,
) -> Wizard {
    let doc = read_json(path, output, quiet);
    let result = RawWizardConfig::from_json(&doc).and_then(|raw| {
        let mut registry = PredicateRegistry::new();
        if stub_predicates {
            for name in predicate_names(&raw) {
                registry.register(name, |_| false);
            }
        }
        Wizard::from_config(raw, &registry)
    });
    match result {
        Ok(wizard) => wizard,
        Err(e) => {
            let msg = format!("configuration error in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Load a session snapshot, or start from an empty session.
pub(crate) fn load_session(
    path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) -> InMemorySession {
    let Some(path) = path else {
        return InMemorySession::new();
    };
    let doc = read_json(path, output, quiet);
    match InMemorySession::from_json(&doc) {
        Ok(session) => session,
        Err(e) => {
            let msg = format!("session error in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn predicate_names(raw: &RawWizardConfig) -> BTreeSet<String> {
    raw.steps
        .iter()
        .flat_map(|step| &step.forks)
        .filter_map(|fork| match &fork.condition {
            Some(RawCondition::Predicate { predicate }) => Some(predicate.clone()),
            _ => None,
        })
        .collect()
}

/// One line per session mutation, for text output.
pub(crate) fn describe_mutation(mutation: &SessionMutation) -> String {
    match mutation {
        SessionMutation::Set { key, value } => format!("set {} = {}", key, value),
        SessionMutation::Unset { keys } => format!("unset {}", keys.join(", ")),
        SessionMutation::Reset => "reset".to_string(),
    }
}

pub(crate) fn to_pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e))
}
