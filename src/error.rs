//! Error types for todos
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task, refused edit)
//! - 4: Operation failed (storage, serialization)

use std::path::PathBuf;
use thiserror::Error;

use crate::item::TaskId;

/// Exit codes for the todos CLI
pub mod exit_codes {
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for todos operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task {id} is {state}; {action} is disabled")]
    TaskLocked {
        id: TaskId,
        state: &'static str,
        action: &'static str,
    },

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    // Operation failures (exit code 4)
    #[error("Failed to load task list from '{key}': {reason}")]
    LoadFailure { key: String, reason: String },

    #[error("Failed to save task list to '{key}': {reason}")]
    SaveFailure { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::TaskNotFound(_)
            | Error::TaskLocked { .. }
            | Error::ConfirmationRequired(_) => exit_codes::USER_ERROR,

            // Operation failures
            Error::LoadFailure { .. }
            | Error::SaveFailure { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured fields for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "id": id })),
            Error::TaskLocked { id, state, action } => Some(serde_json::json!({
                "id": id,
                "state": state,
                "action": action,
            })),
            _ => None,
        }
    }
}

/// Result type alias for todos operations
pub type Result<T> = std::result::Result<T, Error>;
