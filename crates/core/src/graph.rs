//! The static step graph.
//!
//! Built once when a wizard is loaded: every step is a node, and its `next`
//! pointer plus every fork target are outgoing edges. Invalidation and
//! analysis walk this adjacency list instead of re-reading configuration on
//! each request.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::error::ConfigError;
use crate::types::StepDefinition;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepGraph {
    /// step id -> successors, `next` first, then fork targets in
    /// declaration order. Duplicate edges are collapsed.
    adjacency: BTreeMap<String, Vec<String>>,
}

impl StepGraph {
    pub fn from_steps(steps: &[StepDefinition]) -> Self {
        let mut adjacency = BTreeMap::new();
        for step in steps {
            let mut successors: Vec<String> = Vec::new();
            for target in step.edges() {
                if !successors.iter().any(|s| s == target) {
                    successors.push(target.to_string());
                }
            }
            adjacency.insert(step.id.clone(), successors);
        }
        StepGraph { adjacency }
    }

    pub fn contains(&self, step: &str) -> bool {
        self.adjacency.contains_key(step)
    }

    /// Outgoing edges of `step`. Empty for terminal or undeclared steps.
    pub fn successors(&self, step: &str) -> &[String] {
        self.adjacency.get(step).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Every step reachable from `start` (inclusive), via BFS.
    pub fn reachable_from(&self, start: &str) -> BTreeSet<String> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();

        visited.insert(start.to_string());
        queue.push_back(start);

        while let Some(step) = queue.pop_front() {
            for next in self.successors(step) {
                if visited.insert(next.clone()) {
                    queue.push_back(next.as_str());
                }
            }
        }

        visited
    }

    /// Steps on the branch superseded when the journey switches from `from`
    /// to `to`.
    ///
    /// Walks forward from `from` (depth first, `next` before forks) and
    /// stops at any step reachable from `to`, which is where the two
    /// branches converge. The result is in forward traversal order and
    /// starts with `from`, unless `from` is itself downstream of `to`, in
    /// which case nothing is superseded.
    ///
    /// Returns [`ConfigError::NoConnectingPath`] when the walk never meets
    /// the `to` branch.
    pub fn superseded_path(&self, from: &str, to: &str) -> Result<Vec<String>, ConfigError> {
        for (step, role) in [(from, "superseded path start"), (to, "superseded path end")] {
            if !self.contains(step) {
                return Err(ConfigError::UnknownStep {
                    step: step.to_string(),
                    referenced_by: role.to_string(),
                });
            }
        }

        let converged = self.reachable_from(to);
        if converged.contains(from) {
            return Ok(Vec::new());
        }

        let (path, met) = self.walk_until(from, &converged);
        if !met {
            return Err(ConfigError::NoConnectingPath {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(path)
    }

    /// Steps abandoned when the journey leaves `from` for `to`, allowing
    /// for branches that never rejoin.
    ///
    /// Like [`superseded_path`](Self::superseded_path), but the walk also
    /// stops at `boundary` (normally the confirmation step) and simply ends
    /// at dead ends instead of failing. A `to` that is not a declared step
    /// leads nowhere, so only `to` itself is on its branch.
    pub fn abandoned_branch(&self, from: &str, to: &str, boundary: &str) -> Vec<String> {
        let mut converged = if self.contains(to) {
            self.reachable_from(to)
        } else {
            BTreeSet::from([to.to_string()])
        };
        if converged.contains(from) {
            return Vec::new();
        }
        converged.insert(boundary.to_string());

        let (path, _) = self.walk_until(from, &converged);
        path
    }

    /// Depth-first walk from `from` (`next` before forks) that does not
    /// enter any step in `stop`. Returns the steps walked in forward order
    /// and whether a stop step was met.
    fn walk_until(&self, from: &str, stop: &BTreeSet<String>) -> (Vec<String>, bool) {
        let mut path = Vec::new();
        let mut visited = BTreeSet::new();
        let mut met = false;
        let mut stack = vec![from];

        while let Some(step) = stack.pop() {
            if !visited.insert(step) {
                continue;
            }
            if stop.contains(step) {
                met = true;
                continue;
            }
            path.push(step.to_string());
            // Reverse so the first declared edge is explored first.
            for next in self.successors(step).iter().rev() {
                if !visited.contains(next.as_str()) {
                    stack.push(next.as_str());
                }
            }
        }

        (path, met)
    }
}
