use serde_json::json;

use super::{check, keys, Check, Outcome};
use crate::{SessionError, SessionModel, STEPS_KEY};

pub(super) fn checks<S: SessionModel>() -> Vec<Check<S>> {
    vec![
        check("history_defaults_to_empty", history_defaults_to_empty),
        check("history_round_trips_in_order", history_round_trips_in_order),
        check("has_visited_reflects_history", has_visited_reflects_history),
        check("malformed_history_is_an_error", malformed_history_is_an_error),
    ]
}

fn history_defaults_to_empty<S: SessionModel>(s: &mut S) -> Outcome {
    let steps = s.steps()?;
    if !steps.is_empty() {
        return Err(format!("expected empty history, got {steps:?}").into());
    }
    Ok(())
}

fn history_round_trips_in_order<S: SessionModel>(s: &mut S) -> Outcome {
    let written = keys(&["/three", "/one", "/two"]);
    s.set_steps(&written)?;
    let read = s.steps()?;
    if read != written {
        return Err(format!("expected {written:?}, got {read:?}").into());
    }
    Ok(())
}

fn has_visited_reflects_history<S: SessionModel>(s: &mut S) -> Outcome {
    s.set_steps(&keys(&["/one"]))?;
    let visited = s.has_visited("/one")?;
    let not_visited = s.has_visited("/two")?;
    if !visited || not_visited {
        return Err(format!("has_visited mismatch: /one={visited}, /two={not_visited}").into());
    }
    Ok(())
}

fn malformed_history_is_an_error<S: SessionModel>(s: &mut S) -> Outcome {
    s.set(STEPS_KEY, json!({"not": "a list"}))?;
    match s.steps() {
        Err(SessionError::MalformedHistory { .. }) => Ok(()),
        Err(other) => Err(format!("expected MalformedHistory, got {other}").into()),
        Ok(steps) => Err(format!("expected MalformedHistory, got {steps:?}").into()),
    }
}
