//! Error types for vedra-editor

use thiserror::Error;
use vedra_domain::{RecordError, ValidationError, VisibilityLevel};

use crate::config::ConfigError;
use crate::repository::RepositoryError;

/// Result type alias for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Main error type for editor operations
#[derive(Error, Debug)]
pub enum EditorError {
    /// Programmer errors from the mutation engine
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    /// File batch rejected at intake
    #[error("Capacity error: {0}")]
    Capacity(#[from] CapacityError),

    /// Embargo change rejected
    #[error("Visibility error: {0}")]
    Visibility(#[from] VisibilityError),

    /// Publish refused; carries every entry found, warnings included
    #[error("Validation failed: {}", blocking_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Operation not allowed in the current lifecycle state
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Metadata repository failure
    #[error("Repository error: {0}")]
    Transport(#[from] RepositoryError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No identity available for a repository call
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Operation cancelled through its token
    #[error("Operation cancelled")]
    Cancelled,

    /// Record (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EditorError {
    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            EditorError::Transport(err) => err.is_retryable(),
            EditorError::Cancelled => true,
            _ => false,
        }
    }
}

fn blocking_messages(errors: &[ValidationError]) -> String {
    vedra_domain::error_messages(errors).join("; ")
}

impl From<RecordError> for EditorError {
    fn from(err: RecordError) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

/// Mutation engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Path/value mismatch or unknown path; never caused by user input
    #[error("Invalid mutation of {path}: {reason}")]
    Misuse { path: String, reason: String },

    /// A visibility change the reducer refused
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
}

impl MutationError {
    pub(crate) fn misuse(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MutationError::Misuse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// File intake errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    /// The batch would exceed the file count limit
    #[error("Too many files: {current} attached + {incoming} new exceeds the limit of {max}")]
    TooManyFiles {
        current: usize,
        incoming: usize,
        max: usize,
    },

    /// The batch would exceed the total size limit
    #[error("Files too large: {current_bytes} + {incoming_bytes} bytes exceeds the limit of {max_bytes} bytes")]
    TooLarge {
        current_bytes: u64,
        incoming_bytes: u64,
        max_bytes: u64,
    },

    /// Empty file name or a name containing '/'
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}

/// Visibility reducer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisibilityError {
    /// Embargo toggled on while the level is not Restricted
    #[error("An embargo requires Restricted visibility (current level: {level})")]
    EmbargoRequiresRestricted { level: VisibilityLevel },

    /// Embargo date or reason edited while the embargo is off
    #[error("The embargo is not enabled")]
    EmbargoNotEnabled,
}

/// Lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// Invalid state transition
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A publish is already in flight
    #[error("A publish is already in progress")]
    Busy,

    /// The record is read-only in this state
    #[error("The record cannot be edited while {state}")]
    NotEditable { state: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use vedra_domain::Record;

    #[test]
    fn test_validation_display_lists_blocking_messages() {
        let errors = vedra_domain::validate_for_publish(&Record::empty());
        let err = EditorError::Validation(errors);
        let text = err.to_string();
        assert!(text.contains("At least one title is required"));
        assert!(text.contains("At least one creator is required"));
    }

    #[test]
    fn test_retryable() {
        assert!(EditorError::Transport(RepositoryError::Timeout).is_retryable());
        assert!(!EditorError::NotAuthenticated.is_retryable());
        assert!(!EditorError::Transport(RepositoryError::Unauthorized).is_retryable());
    }

    #[test]
    fn test_visibility_error_passes_through_mutation() {
        let err = MutationError::from(VisibilityError::EmbargoNotEnabled);
        assert_eq!(err.to_string(), "The embargo is not enabled");
    }
}
