//! Error types for the CFS workflow engine
//!
//! Each error type has a corresponding error code for programmatic handling.

use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, CfsError>;

/// Main error type for all workflow operations
#[derive(Debug, Error)]
pub enum CfsError {
    /// Requested state change is not in the transition table, or leaves a terminal state
    #[error("Illegal transition for {entity}: {from} -> {to}")]
    IllegalTransition {
        entity: String,
        from: String,
        to: String,
    },

    /// A gate evaluated false; the message names the failed precondition
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// A newer attempt superseded the one that produced this result
    #[error("Attempt {0} was superseded")]
    StaleAttempt(u64),

    /// Another workflow action is already in flight for this entity
    #[error("Busy: {0}")]
    Busy(String),

    /// Malformed input: a required identifier or field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Entity not found in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// No `.cfs` data directory found above the working directory
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// External store rejected or failed the request
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid JSON format
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error with context
    #[error("{context}: {message}")]
    Wrapped { context: String, message: String },
}

impl CfsError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CfsError::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            CfsError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            CfsError::StaleAttempt(_) => "STALE_ATTEMPT",
            CfsError::Busy(_) => "BUSY",
            CfsError::MissingField(_) => "MISSING_FIELD",
            CfsError::NotFound(_) => "NOT_FOUND",
            CfsError::StoreNotFound(_) => "STORE_NOT_FOUND",
            CfsError::Store(_) => "STORE_ERROR",
            CfsError::InvalidJson(_) => "INVALID_JSON",
            CfsError::FileNotFound(_) => "FILE_NOT_FOUND",
            CfsError::ConfigError(_) => "CONFIG_ERROR",
            CfsError::Io(_) => "IO_ERROR",
            CfsError::Wrapped { .. } => "WRAPPED_ERROR",
        }
    }

    /// Build an illegal-transition error from any displayable states
    pub fn illegal(
        entity: impl Into<String>,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        CfsError::IllegalTransition {
            entity: entity.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Illegal transitions are fatal and must not be retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, CfsError::IllegalTransition { .. })
    }

    /// Wrap an error with additional context
    pub fn wrap<E: std::fmt::Display>(error: E, context: impl Into<String>) -> Self {
        CfsError::Wrapped {
            context: context.into(),
            message: error.to_string(),
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &CfsError) -> i32 {
    match error {
        CfsError::IllegalTransition { .. } => 3,
        CfsError::PreconditionFailed(_) | CfsError::Busy(_) => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CfsError::illegal("container", "done", "waiting").code(), "ILLEGAL_TRANSITION");
        assert_eq!(CfsError::PreconditionFailed("x".into()).code(), "PRECONDITION_FAILED");
        assert_eq!(CfsError::StaleAttempt(3).code(), "STALE_ATTEMPT");
        assert_eq!(CfsError::Busy("plan-1".into()).code(), "BUSY");
        assert_eq!(CfsError::MissingField("id".into()).code(), "MISSING_FIELD");
        assert_eq!(CfsError::NotFound("plan-1".into()).code(), "NOT_FOUND");
        assert_eq!(CfsError::Store("down".into()).code(), "STORE_ERROR");
        assert_eq!(CfsError::StoreNotFound("/tmp".into()).code(), "STORE_NOT_FOUND");
        assert_eq!(CfsError::InvalidJson("test".into()).code(), "INVALID_JSON");
        assert_eq!(CfsError::FileNotFound("test".into()).code(), "FILE_NOT_FOUND");
        assert_eq!(CfsError::ConfigError("test".into()).code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(to_exit_code(&CfsError::illegal("plan", "DONE", "IN_PROGRESS")), 3);
        assert_eq!(to_exit_code(&CfsError::PreconditionFailed("equipment not booked".into())), 2);
        assert_eq!(to_exit_code(&CfsError::Store("timeout".into())), 1);
    }

    #[test]
    fn test_illegal_transition_message() {
        let err = CfsError::illegal("container", "done", "in-progress");
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Illegal transition for container: done -> in-progress");
        assert!(!CfsError::PreconditionFailed("x".into()).is_fatal());
    }

    #[test]
    fn test_wrap_error() {
        let wrapped = CfsError::wrap("inner error", "outer context");
        assert_eq!(wrapped.code(), "WRAPPED_ERROR");
        assert!(wrapped.to_string().contains("outer context"));
        assert!(wrapped.to_string().contains("inner error"));
    }
}
