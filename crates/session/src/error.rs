/// All errors that can be returned by a SessionModel implementation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The `steps` history exists but is not a list of step ids.
    #[error("session key '{key}' is not a list of step ids: {found}")]
    MalformedHistory { key: String, found: String },

    /// A backend-specific session store error (connection, serialization, etc.).
    #[error("session backend error: {0}")]
    Backend(String),
}
