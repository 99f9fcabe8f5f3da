use serde_json::json;

use super::{check, expect_value, Check, Outcome};
use crate::SessionModel;

pub(super) fn checks<S: SessionModel>() -> Vec<Check<S>> {
    vec![
        check("reset_clears_values_and_history", reset_clears_values_and_history),
        check("session_usable_after_reset", session_usable_after_reset),
    ]
}

fn reset_clears_values_and_history<S: SessionModel>(s: &mut S) -> Outcome {
    s.set("a", json!(1))?;
    s.set_steps(&["/one".to_string()])?;
    s.reset()?;
    expect_value(s, "a", None)?;
    let steps = s.steps()?;
    if !steps.is_empty() {
        return Err(format!("expected empty history after reset, got {steps:?}").into());
    }
    Ok(())
}

fn session_usable_after_reset<S: SessionModel>(s: &mut S) -> Outcome {
    s.reset()?;
    s.set("a", json!("after"))?;
    expect_value(s, "a", Some(json!("after")))
}
