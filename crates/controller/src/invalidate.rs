//! Clearing answers that belong to an abandoned branch.
//!
//! When an earlier answer changes which branch a journey takes, every step
//! on the old branch is invalidated: its fields are unset and it is removed
//! from the step history. Steps the new branch shares with the old one are
//! left alone.

use stepflow_core::{ConfigError, Wizard};
use stepflow_session::SessionModel;
use tracing::{debug, info};

use crate::error::ControllerError;

/// Forget one step: unset its fields in a single call, then drop it from
/// the history. The order of the remaining history is preserved.
pub fn invalidate_step(
    wizard: &Wizard,
    step: &str,
    session: &mut dyn SessionModel,
) -> Result<(), ControllerError> {
    // The confirmation step may live outside the declared steps; it has no
    // fields of its own but can still sit in the history.
    let fields: &[String] = match wizard.step(step) {
        Some(definition) => definition.fields.as_slice(),
        None if step == wizard.confirm_step() => &[],
        None => {
            return Err(ConfigError::UnknownStep {
                step: step.to_string(),
                referenced_by: "invalidate_step".to_string(),
            }
            .into())
        }
    };
    session.unset(fields)?;

    let history: Vec<String> = session
        .steps()?
        .into_iter()
        .filter(|visited| visited != step)
        .collect();
    session.set_steps(&history)?;

    debug!(step, fields = fields.len(), "step invalidated");
    Ok(())
}

/// Invalidate every step on the branch that `to` supersedes, starting at
/// `from` and walking forward until the walk joins the branch `to` is on.
///
/// Returns the invalidated steps in the order they were cleared.
pub fn invalidate_path(
    wizard: &Wizard,
    from: &str,
    to: &str,
    session: &mut dyn SessionModel,
) -> Result<Vec<String>, ControllerError> {
    let superseded = wizard.graph().superseded_path(from, to)?;
    for step in &superseded {
        invalidate_step(wizard, step, session)?;
    }
    info!(from, to, cleared = superseded.len(), "superseded path invalidated");
    Ok(superseded)
}

/// Invalidate the branch left behind when a journey goes from `from` to
/// `to`, even if the two never rejoin. The walk ends at the confirmation
/// step or at a step with nowhere to go.
pub fn invalidate_branch(
    wizard: &Wizard,
    from: &str,
    to: &str,
    session: &mut dyn SessionModel,
) -> Result<Vec<String>, ControllerError> {
    let abandoned = wizard
        .graph()
        .abandoned_branch(from, to, wizard.confirm_step());
    for step in &abandoned {
        invalidate_step(wizard, step, session)?;
    }
    info!(from, to, cleared = abandoned.len(), "abandoned branch invalidated");
    Ok(abandoned)
}
