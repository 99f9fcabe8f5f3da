use serde::{Deserialize, Serialize};

/// One mutation applied to a session, in the order it was applied.
///
/// Sessions that keep a journal of these let callers audit exactly what an
/// invalidation cleared and in which order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionMutation {
    Set {
        key: String,
        value: serde_json::Value,
    },
    /// A single batched unset of `keys`.
    Unset { keys: Vec<String> },
    Reset,
}
