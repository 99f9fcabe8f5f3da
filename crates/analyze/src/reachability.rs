//! Reachable steps.
//!
//! BFS from the entry step over `next` pointers and every fork target.
//! Declared steps the walk never reaches can never be shown to a user.

use std::collections::BTreeSet;

use serde::Serialize;
use stepflow_core::Wizard;

#[derive(Debug, Clone, Serialize)]
pub struct ReachabilityResult {
    pub entry: String,
    pub reachable_steps: BTreeSet<String>,
    pub unreachable_steps: BTreeSet<String>,
    /// Whether the confirmation step can be reached from the entry.
    pub confirm_reachable: bool,
}

pub fn analyze_reachability(wizard: &Wizard) -> ReachabilityResult {
    let reachable = wizard.graph().reachable_from(wizard.entry());

    let unreachable: BTreeSet<String> = wizard
        .steps()
        .iter()
        .filter(|step| !reachable.contains(&step.id))
        .map(|step| step.id.clone())
        .collect();

    ReachabilityResult {
        entry: wizard.entry().to_string(),
        confirm_reachable: reachable.contains(wizard.confirm_step()),
        reachable_steps: reachable,
        unreachable_steps: unreachable,
    }
}
