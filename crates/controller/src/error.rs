use stepflow_core::ConfigError;
use stepflow_session::SessionError;

/// Errors surfaced while handling a navigation request.
///
/// Validation failures are not errors here; they travel as
/// [`crate::FieldErrors`] and are routed through `error_step`.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Raised by the host's base controller and passed through unchanged.
    #[error("host controller error: {0}")]
    Host(String),
}
