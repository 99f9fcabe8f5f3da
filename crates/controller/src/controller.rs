//! The per-step controller.

use std::sync::Arc;

use stepflow_core::{FormValues, NavigationRequest, StepDefinition, Wizard};
use stepflow_session::SessionModel;
use tracing::{debug, info};

use crate::base::{BaseController, FieldErrors, Locals, ResponseContext, WizardController};
use crate::edit::{edit_error_step, edit_next_step};
use crate::error::ControllerError;
use crate::fork::resolve_next_step;
use crate::invalidate::{invalidate_branch, invalidate_path, invalidate_step};
use crate::locals::extend_locals;

/// Navigation for one step of a wizard, layered on a host base controller.
///
/// The step's options are looked up once at construction; the wizard is
/// shared, so one `Arc<Wizard>` serves every controller.
#[derive(Debug, Clone)]
pub struct StepFlowController<B> {
    options: StepDefinition,
    wizard: Arc<Wizard>,
    base: B,
}

impl StepFlowController<WizardController> {
    /// A controller for `step` with conventional wizard defaults as its
    /// base.
    pub fn with_defaults(wizard: Arc<Wizard>, step: &str) -> Result<Self, ControllerError> {
        let base = WizardController::for_step(wizard.require_step(step, "controller")?);
        StepFlowController::new(wizard, step, base)
    }
}

impl<B: BaseController> StepFlowController<B> {
    pub fn new(wizard: Arc<Wizard>, step: &str, base: B) -> Result<Self, ControllerError> {
        let options = wizard.require_step(step, "controller")?.clone();
        Ok(StepFlowController {
            options,
            wizard,
            base,
        })
    }

    pub fn options(&self) -> &StepDefinition {
        &self.options
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Where a normal submission goes: the base next step, unless a fork
    /// matches.
    pub fn candidate_next_step(&self, request: &NavigationRequest) -> String {
        resolve_next_step(request, self.base.next_step(request), &self.options.forks)
    }

    /// Redirect after a successful submission, taking edit mode into
    /// account.
    pub fn next_step(
        &self,
        request: &NavigationRequest,
        session: &dyn SessionModel,
    ) -> Result<String, ControllerError> {
        let candidate = self.candidate_next_step(request);
        let next = edit_next_step(
            request,
            candidate,
            self.options.continue_on_edit,
            self.wizard.confirm_step(),
            |step| session.has_visited(step),
        )?;
        Ok(next)
    }

    /// Redirect after a failed submission.
    pub fn error_step(&self, errors: &FieldErrors, request: &NavigationRequest) -> String {
        edit_error_step(request, self.base.error_step(errors, request))
    }

    // ── Values & locals ──────────────────────────────────────────────

    /// Values to render. Reaching the end of a journey (no `next`) clears
    /// the session first unless the step sets `clear_session` to false;
    /// setting it to true clears on any step.
    pub fn values(
        &self,
        request: &NavigationRequest,
        session: &mut dyn SessionModel,
    ) -> Result<FormValues, ControllerError> {
        if self
            .options
            .clear_session
            .should_reset(self.options.next.is_some())
        {
            info!(step = %self.options.id, "session reset");
            session.reset()?;
        }
        self.base.values(request, session)
    }

    pub fn errors(&self, request: &NavigationRequest, response: &ResponseContext) -> FieldErrors {
        self.base.errors(request, response)
    }

    /// Template context: base locals plus error counts, the step's static
    /// locals and a summary of every step.
    pub fn locals(&self, request: &NavigationRequest, response: &ResponseContext) -> Locals {
        extend_locals(
            self.base.locals(request, response),
            &self.base.errors(request, response),
            &self.options.locals,
            self.wizard.steps(),
            &response.values,
        )
    }

    // ── Session history ──────────────────────────────────────────────

    pub fn invalidate_step(
        &self,
        step: &str,
        session: &mut dyn SessionModel,
    ) -> Result<(), ControllerError> {
        invalidate_step(&self.wizard, step, session)
    }

    pub fn invalidate_path(
        &self,
        from: &str,
        to: &str,
        session: &mut dyn SessionModel,
    ) -> Result<Vec<String>, ControllerError> {
        invalidate_path(&self.wizard, from, to, session)
    }

    /// Append this step to the history. Returns false if it was already
    /// there.
    pub fn record_step(&self, session: &mut dyn SessionModel) -> Result<bool, ControllerError> {
        let mut history = session.steps()?;
        if history.iter().any(|s| *s == self.options.id) {
            return Ok(false);
        }
        history.push(self.options.id.clone());
        session.set_steps(&history)?;
        Ok(true)
    }

    /// Handle a successful submission: record the step, clear any branch
    /// out of this step that the new answer abandoned, and return the
    /// redirect. Branches that never rejoin are cleared up to the
    /// confirmation step or their last page.
    pub fn complete_step(
        &self,
        request: &NavigationRequest,
        session: &mut dyn SessionModel,
    ) -> Result<String, ControllerError> {
        self.record_step(session)?;

        if self.options.has_forks() {
            let candidate = self.candidate_next_step(request);
            let target = request.unmount(&candidate).to_string();
            let history = session.steps()?;
            let abandoned: Vec<String> = self
                .options
                .edges()
                .filter(|edge| *edge != target && history.iter().any(|s| s == edge))
                .map(str::to_string)
                .collect();
            for edge in abandoned {
                debug!(step = %self.options.id, from = %edge, to = %target, "branch changed");
                invalidate_branch(&self.wizard, &edge, &target, session)?;
            }
        }

        self.next_step(request, session)
    }
}

#[cfg(test)]
mod tests;
