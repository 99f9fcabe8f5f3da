/// A defect in wizard configuration.
///
/// Raised when the configuration is loaded, or when a traversal over the
/// step graph discovers that two steps cannot be connected. Never swallowed:
/// an incomplete invalidation list is worse than a visible failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A step id referenced by `next`, a fork target, `entry`, or a caller
    /// is not declared in the wizard.
    #[error("unknown step '{step}' referenced by {referenced_by}")]
    UnknownStep { step: String, referenced_by: String },

    /// The same step id is declared more than once.
    #[error("step '{step}' is declared more than once")]
    DuplicateStep { step: String },

    /// A fork condition names a predicate that was never registered.
    #[error("fork on step '{step}' references unknown predicate '{predicate}'")]
    UnknownPredicate { step: String, predicate: String },

    /// A fork condition is neither a field-equality rule nor a predicate.
    #[error("fork on step '{step}' has an invalid condition: {message}")]
    InvalidCondition { step: String, message: String },

    /// Walking forward from `from` never meets a step reachable from `to`.
    #[error("no path connects step '{from}' to step '{to}'")]
    NoConnectingPath { from: String, to: String },

    /// The configuration document is not valid JSON for the wizard format.
    #[error("invalid wizard configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read wizard configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
