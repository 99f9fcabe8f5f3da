use serde_json::json;

use super::{check, expect_value, Check, Outcome};
use crate::SessionModel;

pub(super) fn checks<S: SessionModel>() -> Vec<Check<S>> {
    vec![
        check("absent_key_reads_as_none", absent_key_reads_as_none),
        check("set_then_get_returns_value", set_then_get_returns_value),
        check("set_overwrites_previous_value", set_overwrites_previous_value),
        check("structured_values_round_trip", structured_values_round_trip),
    ]
}

fn absent_key_reads_as_none<S: SessionModel>(s: &mut S) -> Outcome {
    expect_value(s, "never-set", None)
}

fn set_then_get_returns_value<S: SessionModel>(s: &mut S) -> Outcome {
    s.set("name", json!("Clark"))?;
    expect_value(s, "name", Some(json!("Clark")))
}

fn set_overwrites_previous_value<S: SessionModel>(s: &mut S) -> Outcome {
    s.set("name", json!("Clark"))?;
    s.set("name", json!("Kal-El"))?;
    expect_value(s, "name", Some(json!("Kal-El")))
}

/// Checkbox groups and address blocks submit arrays and objects.
fn structured_values_round_trip<S: SessionModel>(s: &mut S) -> Outcome {
    let value = json!({"lines": ["1 Main St", "Smallville"], "postcode": null});
    s.set("address", value.clone())?;
    expect_value(s, "address", Some(value))
}
