//! Conformance checks for `SessionModel` implementations.
//!
//! Any session store can run these to confirm it behaves the way the
//! step-flow controller relies on: values round-trip, `unset` is batched
//! and tolerant of absent keys, `reset` clears the history too, and a
//! malformed history is an error rather than an empty one.
//!
//! ```ignore
//! use stepflow_session::conformance::run_conformance_suite;
//!
//! #[test]
//! fn redis_session_conformance() {
//!     let report = run_conformance_suite(|| RedisSession::connect_fresh());
//!     assert!(report.is_clean(), "{report}");
//! }
//! ```

mod history;
mod reset;
mod unset;
mod values;

use std::fmt;

use crate::{SessionError, SessionModel};

/// A named check run against a fresh session.
struct Check<S> {
    name: &'static str,
    run: fn(&mut S) -> Outcome,
}

fn check<S>(name: &'static str, run: fn(&mut S) -> Outcome) -> Check<S> {
    Check { name, run }
}

type Outcome = Result<(), CheckError>;

#[derive(Debug)]
struct CheckError(String);

impl From<SessionError> for CheckError {
    fn from(error: SessionError) -> Self {
        CheckError(error.to_string())
    }
}

impl From<String> for CheckError {
    fn from(message: String) -> Self {
        CheckError(message)
    }
}

/// A check that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// `<group>/<check>`, e.g. `unset/unset_ignores_absent_keys`.
    pub check: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConformanceReport {
    pub checks_run: usize,
    pub failures: Vec<Failure>,
}

impl ConformanceReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn run<S, F>(&mut self, group: &str, checks: Vec<Check<S>>, factory: &F)
    where
        S: SessionModel,
        F: Fn() -> S,
    {
        for check in checks {
            self.checks_run += 1;
            let mut session = factory();
            if let Err(CheckError(message)) = (check.run)(&mut session) {
                self.failures.push(Failure {
                    check: format!("{group}/{}", check.name),
                    message,
                });
            }
        }
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "session conformance: {} checks, {} failed",
            self.checks_run,
            self.failures.len()
        )?;
        for failure in &self.failures {
            writeln!(f, "  {}: {}", failure.check, failure.message)?;
        }
        Ok(())
    }
}

/// Run every check, each against a fresh session from `factory`.
pub fn run_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: SessionModel,
    F: Fn() -> S,
{
    let mut report = ConformanceReport::default();
    report.run("values", values::checks(), &factory);
    report.run("unset", unset::checks(), &factory);
    report.run("reset", reset::checks(), &factory);
    report.run("history", history::checks(), &factory);
    report
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn expect_value<S: SessionModel>(
    session: &S,
    key: &str,
    expected: Option<serde_json::Value>,
) -> Outcome {
    let actual = session.get(key)?;
    if actual != expected {
        return Err(format!("expected {key} = {expected:?}, got {actual:?}").into());
    }
    Ok(())
}
