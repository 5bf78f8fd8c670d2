use thiserror::Error;

/// Discriminated failure returned by every workflow entry point.
///
/// Mutation paths never panic and never throw across the workflow boundary;
/// callers map variants to user-visible text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Input rejected locally; the action was never sent to the service.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The actor lacks capability or the record left the expected state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    /// Another actor already moved the record to a terminal state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Network, timeout, or server failure; retry is manual.
    #[error("transport error: {0}")]
    Transport(String),
    /// Session-termination signal handled by the surrounding auth layer.
    #[error("session expired")]
    AuthExpired,
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WorkflowError::Validation(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        WorkflowError::InvalidTransition(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        WorkflowError::Conflict(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        WorkflowError::Transport(msg.into())
    }

    /// True when the failure reports a record another actor already closed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, WorkflowError::Conflict(_))
    }
}

impl From<validator::ValidationError> for WorkflowError {
    fn from(err: validator::ValidationError) -> Self {
        WorkflowError::Validation(err.code.to_string())
    }
}
