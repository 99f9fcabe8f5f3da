//! Conditional branching.
//!
//! A step's forks are evaluated in declaration order against the
//! submitted request. When several match, the last one wins, so a later,
//! more specific fork can override an earlier catch-all.

use stepflow_core::{Fork, NavigationRequest};
use tracing::debug;

/// The fork a submission takes, if any. Later matches take precedence.
pub fn matching_fork<'a>(request: &NavigationRequest, forks: &'a [Fork]) -> Option<&'a Fork> {
    forks.iter().rev().find(|fork| fork.matches(request))
}

/// Pick the step a submission goes to.
///
/// `base_next_step` is the host's linear next step, already mounted. A
/// matching fork replaces it with its own target, mounted under the same
/// base URL. No fork matching leaves `base_next_step` untouched.
pub fn resolve_next_step(
    request: &NavigationRequest,
    base_next_step: String,
    forks: &[Fork],
) -> String {
    match matching_fork(request, forks) {
        Some(fork) => {
            let target = request.mount(&fork.target);
            debug!(step = %request.step, target = %target, "fork matched");
            target
        }
        None => base_next_step,
    }
}
