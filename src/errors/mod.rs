//! Error handling module for host assignment.
//!
//! Provides centralized error types with stable codes and a response envelope for the replay tool.

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const SELECTION_LOCKED: &str = "SELECTION_LOCKED";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Member or host not found
    NotFound(String),
    /// Intent rejected by validation (untrusted ids, wrong strategy)
    Validation(String),
    /// Manual edit attempted while assign-all owns the selection
    SelectionLocked(String),
    /// Malformed input document
    BadRequest(String),
    /// Reading or writing a file failed
    Io(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::SelectionLocked(_) => codes::SELECTION_LOCKED,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Io(_) => codes::IO_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::SelectionLocked(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Io(msg) => msg.clone(),
        }
    }

    pub fn details(&self) -> ErrorDetails {
        ErrorDetails {
            code: self.error_code().to_string(),
            message: self.message(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        AppError::Io(format!("IO error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub revision_id: u64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, revision_id: u64) -> Self {
        Self {
            success: false,
            error: error.details(),
            revision_id,
        }
    }
}
