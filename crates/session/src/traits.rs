use crate::error::SessionError;

/// Session key holding the ordered list of visited step ids.
pub const STEPS_KEY: &str = "steps";

/// The session store for one user's journey through a wizard.
///
/// A `SessionModel` is scoped to a single user session; the host framework
/// hands one instance to each request. Values are JSON so that any
/// answer a form can submit round-trips unchanged.
///
/// ## History
///
/// The [`STEPS_KEY`] entry records visited step ids in traversal order.
/// The provided methods read and write it; implementations only need the
/// four primitive operations.
///
/// ## Atomicity
///
/// Each primitive operation is expected to be atomic on its own. `unset`
/// takes every key in one call so that a backend can clear a whole step's
/// answers in a single round-trip.
pub trait SessionModel {
    // ── Primitive operations ─────────────────────────────────────────

    /// Read a value. Returns `Ok(None)` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SessionError>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: serde_json::Value) -> Result<(), SessionError>;

    /// Remove every key in `keys`. Keys that are absent are ignored.
    fn unset(&mut self, keys: &[String]) -> Result<(), SessionError>;

    /// Remove everything, including the step history.
    fn reset(&mut self) -> Result<(), SessionError>;

    // ── Step history ─────────────────────────────────────────────────

    /// Visited step ids in traversal order. Empty if nothing was recorded.
    fn steps(&self) -> Result<Vec<String>, SessionError> {
        let Some(value) = self.get(STEPS_KEY)? else {
            return Ok(Vec::new());
        };
        let malformed = || SessionError::MalformedHistory {
            key: STEPS_KEY.to_string(),
            found: value.to_string(),
        };
        let items = value.as_array().ok_or_else(malformed)?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(malformed))
            .collect()
    }

    /// Replace the step history.
    fn set_steps(&mut self, steps: &[String]) -> Result<(), SessionError> {
        let list = steps
            .iter()
            .map(|s| serde_json::Value::String(s.clone()))
            .collect();
        self.set(STEPS_KEY, serde_json::Value::Array(list))
    }

    fn has_visited(&self, step: &str) -> Result<bool, SessionError> {
        Ok(self.steps()?.iter().any(|s| s == step))
    }
}

impl<S: SessionModel + ?Sized> SessionModel for &mut S {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SessionError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: serde_json::Value) -> Result<(), SessionError> {
        (**self).set(key, value)
    }

    fn unset(&mut self, keys: &[String]) -> Result<(), SessionError> {
        (**self).unset(keys)
    }

    fn reset(&mut self) -> Result<(), SessionError> {
        (**self).reset()
    }
}
