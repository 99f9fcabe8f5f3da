use std::cell::RefCell;
use std::sync::Arc;

use serde_json::json;
use stepflow_core::{Action, ClearSession, Condition, Fork, NavigationRequest, StepDefinition, Wizard};
use stepflow_session::{InMemorySession, SessionModel, SessionMutation};

use super::*;
use crate::base::FieldError;

/// Base controller that returns canned answers and records what it was
/// asked.
#[derive(Debug, Default)]
struct StubBase {
    next: String,
    error: String,
    locals: Locals,
    errors: FieldErrors,
    values_error: Option<String>,
    values_calls: RefCell<Vec<(NavigationRequest, Option<serde_json::Value>)>>,
}

impl StubBase {
    fn next(next: &str) -> Self {
        StubBase {
            next: next.to_string(),
            error: "/step".to_string(),
            ..Default::default()
        }
    }
}

impl BaseController for StubBase {
    fn next_step(&self, _request: &NavigationRequest) -> String {
        self.next.clone()
    }

    fn error_step(&self, _errors: &FieldErrors, _request: &NavigationRequest) -> String {
        self.error.clone()
    }

    fn values(
        &self,
        request: &NavigationRequest,
        session: &mut dyn SessionModel,
    ) -> Result<FormValues, ControllerError> {
        if let Some(message) = &self.values_error {
            return Err(ControllerError::Host(message.clone()));
        }
        let marker = session.get("marker")?;
        self.values_calls
            .borrow_mut()
            .push((request.clone(), marker));
        Ok(FormValues::new())
    }

    fn locals(&self, _request: &NavigationRequest, _response: &ResponseContext) -> Locals {
        self.locals.clone()
    }

    fn errors(&self, _request: &NavigationRequest, _response: &ResponseContext) -> FieldErrors {
        self.errors.clone()
    }
}

fn wizard_with(step: StepDefinition) -> Arc<Wizard> {
    let mut steps = vec![
        StepDefinition::new("/next-page"),
        StepDefinition::new("/target-page"),
        StepDefinition::new("/superman-page"),
        StepDefinition::new("/batman-page"),
        StepDefinition::new("/smallville-page"),
    ];
    steps.insert(0, step);
    Arc::new(Wizard::new(steps, "/confirm").unwrap())
}

fn controller(step: StepDefinition, base: StubBase) -> StepFlowController<StubBase> {
    let id = step.id.clone();
    StepFlowController::new(wizard_with(step), &id, base).unwrap()
}

fn radio(value: &str) -> NavigationRequest {
    NavigationRequest::new("/step").with_value("example-radio", value)
}

fn history(steps: &[&str]) -> InMemorySession {
    InMemorySession::from_json(&json!({ "steps": steps })).unwrap()
}

fn superman_fork() -> Fork {
    superman_fork_to("/target-page")
}

fn superman_fork_to(target: &str) -> Fork {
    Fork::new(
        target,
        Condition::predicate("is-superman", |req: &NavigationRequest| {
            req.value("example-radio") == Some(&json!("superman"))
        }),
    )
}

// ──────────────────────────────────────────────
// Construction
// ──────────────────────────────────────────────

#[test]
fn unknown_step_is_a_config_error() {
    let wizard = wizard_with(StepDefinition::new("/step"));
    let err = StepFlowController::new(wizard, "/missing", StubBase::next("/")).unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Config(stepflow_core::ConfigError::UnknownStep { .. })
    ));
}

#[test]
fn defaults_follow_next_under_base_url() {
    let wizard = Arc::new(
        Wizard::new(
            vec![
                StepDefinition::new("/name").with_next("/address"),
                StepDefinition::new("/address"),
            ],
            "/confirm",
        )
        .unwrap(),
    );
    let controller = StepFlowController::with_defaults(wizard, "/name").unwrap();
    let request = NavigationRequest::new("/name").with_base_url("/apply");
    let next = controller
        .next_step(&request, &InMemorySession::new())
        .unwrap();
    assert_eq!(next, "/apply/address");
}

// ──────────────────────────────────────────────
// Next step: edit mode
// ──────────────────────────────────────────────

#[test]
fn edit_with_continue_on_new_step_appends_edit() {
    let controller = controller(
        StepDefinition::new("/step").with_continue_on_edit(true),
        StubBase::next("/next-page"),
    );
    let request = NavigationRequest::new("/step").with_action(Action::Edit);
    let next = controller.next_step(&request, &history(&["/step"])).unwrap();
    assert_eq!(next, "/next-page/edit");
}

#[test]
fn edit_without_continue_goes_to_confirm() {
    let controller = controller(StepDefinition::new("/step"), StubBase::next("/next-page"));
    let request = NavigationRequest::new("/step").with_action(Action::Edit);
    let next = controller.next_step(&request, &history(&[])).unwrap();
    assert_eq!(next, "/confirm");
}

#[test]
fn edit_confirm_is_mounted_under_base_url() {
    let controller = controller(StepDefinition::new("/step"), StubBase::next("/app/next-page"));
    let request = NavigationRequest::new("/step")
        .with_base_url("/app")
        .with_action(Action::Edit);
    let next = controller.next_step(&request, &history(&[])).unwrap();
    assert_eq!(next, "/app/confirm");
}

#[test]
fn edit_with_continue_onto_confirm_has_no_suffix() {
    let controller = controller(
        StepDefinition::new("/step").with_continue_on_edit(true),
        StubBase::next("/confirm"),
    );
    let request = NavigationRequest::new("/step").with_action(Action::Edit);
    let next = controller.next_step(&request, &history(&[])).unwrap();
    assert_eq!(next, "/confirm");
}

#[test]
fn edit_with_continue_onto_visited_step_goes_to_confirm() {
    let controller = controller(
        StepDefinition::new("/step").with_continue_on_edit(true),
        StubBase::next("/next-page"),
    );
    let request = NavigationRequest::new("/step").with_action(Action::Edit);
    let next = controller
        .next_step(&request, &history(&["/step", "/next-page"]))
        .unwrap();
    assert_eq!(next, "/confirm");
}

#[test]
fn malformed_history_is_reported() {
    let controller = controller(
        StepDefinition::new("/step").with_continue_on_edit(true),
        StubBase::next("/next-page"),
    );
    let request = NavigationRequest::new("/step").with_action(Action::Edit);
    let session = InMemorySession::from_json(&json!({"steps": "/step"})).unwrap();
    let err = controller.next_step(&request, &session).unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Session(stepflow_session::SessionError::MalformedHistory { .. })
    ));
}

// ──────────────────────────────────────────────
// Next step: forks
// ──────────────────────────────────────────────

#[test]
fn field_condition_met_takes_fork() {
    let controller = controller(
        StepDefinition::new("/step").with_fork(Fork::new(
            "/target-page",
            Condition::field_equals("example-radio", "superman"),
        )),
        StubBase::next("/next-page"),
    );
    let next = controller.next_step(&radio("superman"), &history(&[])).unwrap();
    assert_eq!(next, "/target-page");
}

#[test]
fn field_condition_not_met_keeps_next() {
    let controller = controller(
        StepDefinition::new("/step").with_fork(Fork::new(
            "/target-page",
            Condition::field_equals("example-radio", "lex luther"),
        )),
        StubBase::next("/next-page"),
    );
    let next = controller.next_step(&radio("superman"), &history(&[])).unwrap();
    assert_eq!(next, "/next-page");
}

#[test]
fn predicate_condition_met_takes_fork() {
    let controller = controller(
        StepDefinition::new("/step").with_fork(superman_fork()),
        StubBase::next("/next-page"),
    );
    let next = controller.next_step(&radio("superman"), &history(&[])).unwrap();
    assert_eq!(next, "/target-page");
}

#[test]
fn predicate_condition_not_met_keeps_next() {
    let controller = controller(
        StepDefinition::new("/step").with_fork(superman_fork()),
        StubBase::next("/next-page"),
    );
    let next = controller.next_step(&radio("batman"), &history(&[])).unwrap();
    assert_eq!(next, "/next-page");
}

#[test]
fn edit_after_taking_fork_before_returns_to_confirm() {
    let controller = controller(
        StepDefinition::new("/step").with_fork(superman_fork()),
        StubBase::next("/next-page"),
    );
    let request = radio("superman").with_action(Action::Edit);
    let next = controller
        .next_step(&request, &history(&["/target-page"]))
        .unwrap();
    assert_eq!(next, "/confirm");
}

#[test]
fn edit_onto_new_fork_without_continue_returns_to_confirm() {
    let controller = controller(
        StepDefinition::new("/step").with_fork(superman_fork()),
        StubBase::next("/next-page"),
    );
    let request = radio("superman").with_action(Action::Edit);
    let next = controller.next_step(&request, &history(&[])).unwrap();
    assert_eq!(next, "/confirm");
}

#[test]
fn edit_onto_new_fork_with_continue_stays_in_edit() {
    let controller = controller(
        StepDefinition::new("/step")
            .with_fork(superman_fork())
            .with_continue_on_edit(true),
        StubBase::next("/next-page"),
    );
    let request = radio("superman").with_action(Action::Edit);
    let next = controller
        .next_step(&request, &history(&["/step", "/next-page"]))
        .unwrap();
    assert_eq!(next, "/target-page/edit");
}

#[test]
fn edit_back_onto_visited_standard_path_returns_to_confirm() {
    let controller = controller(
        StepDefinition::new("/step")
            .with_fork(superman_fork())
            .with_continue_on_edit(true),
        StubBase::next("/next-page"),
    );
    let request = radio("clark-kent").with_action(Action::Edit);
    let next = controller
        .next_step(&request, &history(&["/step", "/next-page"]))
        .unwrap();
    assert_eq!(next, "/confirm");
}

#[test]
fn edit_onto_unvisited_standard_path_with_continue_stays_in_edit() {
    let controller = controller(
        StepDefinition::new("/step")
            .with_fork(superman_fork())
            .with_continue_on_edit(true),
        StubBase::next("/next-page"),
    );
    let request = radio("clark-kent").with_action(Action::Edit);
    let next = controller
        .next_step(&request, &history(&["/step", "/target-page"]))
        .unwrap();
    assert_eq!(next, "/next-page/edit");
}

#[test]
fn identical_conditions_resolve_to_last_fork() {
    let controller = controller(
        StepDefinition::new("/step")
            .with_fork(Fork::new(
                "/superman-page",
                Condition::field_equals("example-radio", "superman"),
            ))
            .with_fork(Fork::new(
                "/batman-page",
                Condition::field_equals("example-radio", "superman"),
            )),
        StubBase::next("/next-page"),
    );
    let next = controller.next_step(&radio("superman"), &history(&[])).unwrap();
    assert_eq!(next, "/batman-page");
}

fn two_field_forks() -> StepDefinition {
    StepDefinition::new("/step")
        .with_fork(Fork::new(
            "/superman-page",
            Condition::field_equals("example-radio", "superman"),
        ))
        .with_fork(Fork::new(
            "/smallville-page",
            Condition::field_equals("example-email", "clarke@smallville.com"),
        ))
}

#[test]
fn different_conditions_both_met_resolve_to_last_fork() {
    let controller = controller(two_field_forks(), StubBase::next("/next-page"));
    let request = radio("superman").with_value("example-email", "clarke@smallville.com");
    let next = controller.next_step(&request, &history(&[])).unwrap();
    assert_eq!(next, "/smallville-page");
}

#[test]
fn only_first_condition_met_resolves_to_first_fork() {
    let controller = controller(two_field_forks(), StubBase::next("/next-page"));
    let request = radio("superman").with_value("example-email", "kent@smallville.com");
    let next = controller.next_step(&request, &history(&[])).unwrap();
    assert_eq!(next, "/superman-page");
}

// ──────────────────────────────────────────────
// Error step
// ──────────────────────────────────────────────

#[test]
fn error_step_delegates_outside_edit() {
    let controller = controller(StepDefinition::new("/step"), StubBase::next("/next-page"));
    let step = controller.error_step(&FieldErrors::new(), &NavigationRequest::new("/step"));
    assert_eq!(step, "/step");
}

#[test]
fn error_step_in_edit_appends_suffix_once() {
    let mut base = StubBase::next("/next-page");
    base.error = "/step/edit".to_string();
    let controller = controller(StepDefinition::new("/step"), base);
    let request = NavigationRequest::new("/step").with_action(Action::Edit);
    assert_eq!(
        controller.error_step(&FieldErrors::new(), &request),
        "/step/edit"
    );

    let controller = self::controller(StepDefinition::new("/step"), StubBase::next("/next-page"));
    assert_eq!(
        controller.error_step(&FieldErrors::new(), &request),
        "/step/edit"
    );
}

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

fn marked_session() -> InMemorySession {
    InMemorySession::from_json(&json!({"marker": true, "steps": ["/step"]})).unwrap()
}

fn resets(session: &InMemorySession) -> usize {
    session
        .journal()
        .iter()
        .filter(|m| matches!(m, SessionMutation::Reset))
        .count()
}

#[test]
fn step_with_next_keeps_session() {
    let controller = controller(
        StepDefinition::new("/step").with_next("/next-page"),
        StubBase::next("/next-page"),
    );
    let mut session = marked_session();
    controller
        .values(&NavigationRequest::new("/step"), &mut session)
        .unwrap();
    assert_eq!(resets(&session), 0);
}

#[test]
fn step_without_next_resets_session() {
    let controller = controller(StepDefinition::new("/step"), StubBase::next("/step"));
    let mut session = marked_session();
    controller
        .values(&NavigationRequest::new("/step"), &mut session)
        .unwrap();
    assert_eq!(resets(&session), 1);
}

#[test]
fn clear_session_false_never_resets() {
    let controller = controller(
        StepDefinition::new("/step").with_clear_session(ClearSession::False),
        StubBase::next("/step"),
    );
    let mut session = marked_session();
    controller
        .values(&NavigationRequest::new("/step"), &mut session)
        .unwrap();
    assert_eq!(resets(&session), 0);
}

#[test]
fn clear_session_true_always_resets() {
    let controller = controller(
        StepDefinition::new("/step")
            .with_next("/next-page")
            .with_clear_session(ClearSession::True),
        StubBase::next("/next-page"),
    );
    let mut session = marked_session();
    controller
        .values(&NavigationRequest::new("/step"), &mut session)
        .unwrap();
    assert_eq!(resets(&session), 1);
}

#[test]
fn values_always_forwards_the_same_request_after_reset() {
    let controller = controller(StepDefinition::new("/step"), StubBase::next("/step"));
    let request = radio("superman").with_base_url("/app");
    let mut session = marked_session();
    controller.values(&request, &mut session).unwrap();

    let calls = controller.base().values_calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, request);
    // The base saw the session after it was cleared.
    assert_eq!(calls[0].1, None);
}

#[test]
fn host_errors_pass_through_values() {
    let mut base = StubBase::next("/next-page");
    base.values_error = Some("session store offline".to_string());
    let controller = controller(StepDefinition::new("/step"), base);
    let mut session = marked_session();

    let err = controller
        .values(&NavigationRequest::new("/step"), &mut session)
        .unwrap_err();
    assert!(matches!(err, ControllerError::Host(ref m) if m == "session store offline"));
    // The reset still happened before the host was asked.
    assert_eq!(resets(&session), 1);
}

// ──────────────────────────────────────────────
// Locals
// ──────────────────────────────────────────────

#[test]
fn locals_extend_base_locals() {
    let mut base = StubBase::next("/next-page");
    base.locals.insert("foo".to_string(), json!("bar"));
    base.errors.insert("foo".to_string(), FieldError::new("foo", "required"));
    let controller = controller(StepDefinition::new("/step"), base);
    let locals = controller.locals(&NavigationRequest::new("/step"), &ResponseContext::default());
    assert_eq!(locals["foo"], json!("bar"));
    assert_eq!(locals["errorLength"], json!({"single": true}));
}

#[test]
fn locals_count_multiple_errors() {
    let mut base = StubBase::next("/next-page");
    for key in ["bar", "baz"] {
        base.errors.insert(key.to_string(), FieldError::new(key, "required"));
    }
    let controller = controller(StepDefinition::new("/step"), base);
    let locals = controller.locals(&NavigationRequest::new("/step"), &ResponseContext::default());
    assert_eq!(locals["errorLength"], json!({"multiple": true}));
}

#[test]
fn locals_expose_static_step_locals_and_summaries() {
    let controller = controller(
        StepDefinition::new("/step")
            .with_fields(["example-radio"])
            .with_local("test", "bar"),
        StubBase::next("/next-page"),
    );
    let mut response = ResponseContext::default();
    response
        .values
        .insert("example-radio".to_string(), json!("superman"));
    let locals = controller.locals(&NavigationRequest::new("/step"), &response);

    assert_eq!(locals["test"], json!("bar"));
    assert_eq!(
        locals["stepSummaries"][0],
        json!({"step": "/step", "fieldCount": 1, "answered": 1, "errorCount": 0})
    );
    assert_eq!(locals["stepSummaries"].as_array().map(Vec::len), Some(6));
}

// ──────────────────────────────────────────────
// History
// ──────────────────────────────────────────────

#[test]
fn record_step_appends_once() {
    let controller = controller(StepDefinition::new("/step"), StubBase::next("/next-page"));
    let mut session = history(&["/start"]);
    assert!(controller.record_step(&mut session).unwrap());
    assert!(!controller.record_step(&mut session).unwrap());
    assert_eq!(session.steps().unwrap(), vec!["/start", "/step"]);
}

/// /step -> /next-page -> /after -> /done
/// /step -fork-> /target-page -> /done
fn branching_wizard() -> Arc<Wizard> {
    Arc::new(
        Wizard::new(
            vec![
                StepDefinition::new("/step")
                    .with_fields(["example-radio"])
                    .with_next("/next-page")
                    .with_fork(superman_fork()),
                StepDefinition::new("/next-page")
                    .with_fields(["next"])
                    .with_next("/after"),
                StepDefinition::new("/after").with_fields(["after"]).with_next("/done"),
                StepDefinition::new("/target-page")
                    .with_fields(["target"])
                    .with_next("/done"),
                StepDefinition::new("/done"),
            ],
            "/confirm",
        )
        .unwrap(),
    )
}

#[test]
fn complete_step_clears_abandoned_branch() {
    let controller = StepFlowController::with_defaults(branching_wizard(), "/step").unwrap();
    let mut session = InMemorySession::from_json(&json!({
        "steps": ["/step", "/next-page", "/after", "/done"],
        "example-radio": "clark-kent",
        "next": 1,
        "after": 2
    }))
    .unwrap();

    let next = controller
        .complete_step(&radio("superman"), &mut session)
        .unwrap();

    assert_eq!(next, "/target-page");
    assert_eq!(session.steps().unwrap(), vec!["/step", "/done"]);
    assert_eq!(session.get("next").unwrap(), None);
    assert_eq!(session.get("after").unwrap(), None);
    assert_eq!(session.get("example-radio").unwrap(), Some(json!("clark-kent")));
}

#[test]
fn complete_step_on_same_branch_clears_nothing() {
    let controller = StepFlowController::with_defaults(branching_wizard(), "/step").unwrap();
    let mut session = history(&["/step", "/next-page"]);

    let next = controller
        .complete_step(&radio("clark-kent"), &mut session)
        .unwrap();

    assert_eq!(next, "/next-page");
    assert!(session
        .journal()
        .iter()
        .all(|m| !matches!(m, SessionMutation::Unset { .. })));
}

#[test]
fn complete_step_first_visit_records_history() {
    let controller = StepFlowController::with_defaults(branching_wizard(), "/step").unwrap();
    let mut session = InMemorySession::new();
    let next = controller
        .complete_step(&radio("superman"), &mut session)
        .unwrap();
    assert_eq!(next, "/target-page");
    assert_eq!(session.steps().unwrap(), vec!["/step"]);
}

#[test]
fn complete_step_in_edit_mode_continues_down_new_branch() {
    let wizard = branching_wizard();
    let mut steps = wizard.steps().to_vec();
    steps[0].continue_on_edit = true;
    let wizard = Arc::new(Wizard::new(steps, "/confirm").unwrap());
    let controller = StepFlowController::with_defaults(wizard, "/step").unwrap();
    let mut session = history(&["/step", "/next-page", "/after", "/done"]);

    let request = radio("superman").with_action(Action::Edit);
    let next = controller.complete_step(&request, &mut session).unwrap();
    assert_eq!(next, "/target-page/edit");
}

/// /eligible -> /details -> /confirm
/// /eligible -fork-> /ineligible (an exit page with nowhere to go)
fn exit_page_wizard() -> Arc<Wizard> {
    Arc::new(
        Wizard::new(
            vec![
                StepDefinition::new("/eligible")
                    .with_fields(["example-radio"])
                    .with_next("/details")
                    .with_fork(superman_fork_to("/ineligible")),
                StepDefinition::new("/details")
                    .with_fields(["d"])
                    .with_next("/confirm"),
                StepDefinition::new("/ineligible").with_fields(["reason"]),
            ],
            "/confirm",
        )
        .unwrap(),
    )
}

#[test]
fn complete_step_into_exit_page_clears_main_branch() {
    let controller = StepFlowController::with_defaults(exit_page_wizard(), "/eligible").unwrap();
    let mut session = InMemorySession::from_json(&json!({
        "steps": ["/eligible", "/details"],
        "d": 1
    }))
    .unwrap();

    let next = controller
        .complete_step(&radio("superman"), &mut session)
        .unwrap();

    assert_eq!(next, "/ineligible");
    assert_eq!(session.to_json(), json!({"steps": ["/eligible"]}));
}

#[test]
fn complete_step_out_of_exit_page_clears_it() {
    let controller = StepFlowController::with_defaults(exit_page_wizard(), "/eligible").unwrap();
    let mut session = InMemorySession::from_json(&json!({
        "steps": ["/eligible", "/ineligible"],
        "reason": "too young"
    }))
    .unwrap();

    let next = controller
        .complete_step(&radio("clark-kent"), &mut session)
        .unwrap();

    assert_eq!(next, "/details");
    assert_eq!(session.to_json(), json!({"steps": ["/eligible"]}));
}

#[test]
fn complete_step_forking_to_undeclared_confirm_clears_skipped_branch() {
    let wizard = Arc::new(
        Wizard::new(
            vec![
                StepDefinition::new("/eligible")
                    .with_fields(["example-radio"])
                    .with_next("/details")
                    .with_fork(superman_fork_to("/confirm")),
                StepDefinition::new("/details").with_fields(["d"]),
            ],
            "/confirm",
        )
        .unwrap(),
    );
    let controller = StepFlowController::with_defaults(wizard, "/eligible").unwrap();
    let mut session = InMemorySession::from_json(&json!({
        "steps": ["/eligible", "/details"],
        "d": 1
    }))
    .unwrap();

    let next = controller
        .complete_step(&radio("superman"), &mut session)
        .unwrap();

    assert_eq!(next, "/confirm");
    assert_eq!(session.to_json(), json!({"steps": ["/eligible"]}));
}
