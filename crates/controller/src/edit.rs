//! Edit-mode navigation.
//!
//! When a user comes back from the confirmation page to change one
//! answer, the journey should return to confirmation as soon as possible.
//! It only continues forward (in edit mode) when the step opts in with
//! `continue_on_edit` and the answer sent the user somewhere they have
//! not been yet.

use stepflow_core::{mount, NavigationRequest, EDIT_SUFFIX};
use stepflow_session::SessionError;
use tracing::debug;

/// Redirect for a successful edit-mode submission.
///
/// `candidate` is the mounted next step (base logic plus forks).
/// `visited` reports whether a step id is already in the session history.
/// Non-edit requests get `candidate` back unchanged and never consult the
/// history.
pub fn edit_next_step<F>(
    request: &NavigationRequest,
    candidate: String,
    continue_on_edit: bool,
    confirm_step: &str,
    visited: F,
) -> Result<String, SessionError>
where
    F: FnOnce(&str) -> Result<bool, SessionError>,
{
    if !request.is_edit() {
        return Ok(candidate);
    }

    let confirm = mount(&request.base_url, confirm_step);
    if !continue_on_edit || candidate == confirm {
        debug!(step = %request.step, target = %confirm, "edit returns to confirmation");
        return Ok(confirm);
    }

    if visited(request.unmount(&candidate))? {
        debug!(step = %request.step, target = %confirm, "edit stayed on the visited path");
        return Ok(confirm);
    }

    let target = format!("{candidate}{EDIT_SUFFIX}");
    debug!(step = %request.step, target = %target, "edit continues down a new branch");
    Ok(target)
}

/// Redirect after a failed edit-mode submission: keep the user in edit
/// mode on whatever page the host chose.
pub fn edit_error_step(request: &NavigationRequest, base_error_step: String) -> String {
    if request.is_edit() && !base_error_step.ends_with(EDIT_SUFFIX) {
        format!("{base_error_step}{EDIT_SUFFIX}")
    } else {
        base_error_step
    }
}
