use serde_json::json;

use super::{check, expect_value, keys, Check, Outcome};
use crate::SessionModel;

pub(super) fn checks<S: SessionModel>() -> Vec<Check<S>> {
    vec![
        check("unset_removes_every_listed_key", unset_removes_every_listed_key),
        check("unset_leaves_other_keys", unset_leaves_other_keys),
        check("unset_ignores_absent_keys", unset_ignores_absent_keys),
        check("unset_empty_list_is_noop", unset_empty_list_is_noop),
    ]
}

fn unset_removes_every_listed_key<S: SessionModel>(s: &mut S) -> Outcome {
    s.set("a", json!(1))?;
    s.set("b", json!(2))?;
    s.unset(&keys(&["a", "b"]))?;
    expect_value(s, "a", None)?;
    expect_value(s, "b", None)
}

fn unset_leaves_other_keys<S: SessionModel>(s: &mut S) -> Outcome {
    s.set("a", json!(1))?;
    s.set("keep", json!("yes"))?;
    s.unset(&keys(&["a"]))?;
    expect_value(s, "keep", Some(json!("yes")))
}

fn unset_ignores_absent_keys<S: SessionModel>(s: &mut S) -> Outcome {
    s.set("a", json!(1))?;
    s.unset(&keys(&["a", "never-set"]))
        .map_err(|e| format!("unset of an absent key failed: {e}"))?;
    expect_value(s, "a", None)
}

fn unset_empty_list_is_noop<S: SessionModel>(s: &mut S) -> Outcome {
    s.set("a", json!(1))?;
    s.unset(&[])?;
    expect_value(s, "a", Some(json!(1)))
}
