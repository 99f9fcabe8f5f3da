//! Fork configuration checks.
//!
//! A fork without a condition adds a graph edge but can never be taken at
//! runtime. Two forks on the same step with the same target are legal
//! (the later one wins) but almost always a copy-paste slip.

use std::collections::BTreeMap;

use serde::Serialize;
use stepflow_core::Wizard;

#[derive(Debug, Clone, Serialize)]
pub struct ForkResult {
    /// step id -> targets of forks with no condition
    pub unconditional: BTreeMap<String, Vec<String>>,
    /// step id -> targets declared by more than one fork
    pub duplicate_targets: BTreeMap<String, Vec<String>>,
    /// step id -> fork targets identical to the step's own `next`
    pub redundant_targets: BTreeMap<String, Vec<String>>,
    pub fork_count: usize,
}

pub fn analyze_forks(wizard: &Wizard) -> ForkResult {
    let mut result = ForkResult {
        unconditional: BTreeMap::new(),
        duplicate_targets: BTreeMap::new(),
        redundant_targets: BTreeMap::new(),
        fork_count: 0,
    };

    for step in wizard.steps() {
        result.fork_count += step.forks.len();

        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for fork in &step.forks {
            *seen.entry(fork.target.as_str()).or_default() += 1;

            if fork.condition.is_none() {
                result
                    .unconditional
                    .entry(step.id.clone())
                    .or_default()
                    .push(fork.target.clone());
            }
            if step.next.as_deref() == Some(fork.target.as_str()) {
                result
                    .redundant_targets
                    .entry(step.id.clone())
                    .or_default()
                    .push(fork.target.clone());
            }
        }

        let duplicates: Vec<String> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(target, _)| target.to_string())
            .collect();
        if !duplicates.is_empty() {
            result.duplicate_targets.insert(step.id.clone(), duplicates);
        }
    }

    result
}
