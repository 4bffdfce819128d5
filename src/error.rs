//! Error types for lanes
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, blank input, invalid config)
//! - 3: Stale target (key no longer in cache or store)
//! - 4: Operation failed (store unreachable, IO, serialization)

use thiserror::Error;

/// Exit codes for the lanes CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const STALE_TARGET: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for board operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Stale targets (exit code 3)
    #[error("No record with key {0}")]
    NotFound(String),

    #[error("Task is no longer on the board: {0}")]
    State(String),

    #[error("A drag is already in flight for {0}")]
    DragInFlight(String),

    // Operation failures (exit code 4)
    #[error("Record store unreachable: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_) | Error::InvalidArgument(_) | Error::Validation(_) => {
                exit_codes::USER_ERROR
            }

            // Stale targets
            Error::NotFound(_) | Error::State(_) | Error::DragInFlight(_) => {
                exit_codes::STALE_TARGET
            }

            // Operation failures
            Error::Transport(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: None,
        }
    }
}
