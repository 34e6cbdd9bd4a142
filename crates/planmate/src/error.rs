use std::fmt;

/// Unified error type for the planmate crate.
#[derive(Debug, Clone)]
pub enum CoreError {
    /// No authenticated user identity at tool-invocation time.
    NotAuthenticated,
    /// The model requested a function name that is not registered.
    UnknownTool(String),
    /// Invalid input provided by the caller or the model.
    InvalidInput(String),
    /// The model request failed or returned an unparseable response.
    ModelCommunication(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::NotAuthenticated => write!(f, "User not logged in"),
            CoreError::UnknownTool(name) => write!(f, "Function {name} not found."),
            CoreError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            CoreError::ModelCommunication(msg) => write!(f, "model communication failed: {msg}"),
            CoreError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
