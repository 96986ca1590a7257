//! Error types and handling for `issue_api`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Provides recovery hints for client-facing errors
//! - Maps onto HTTP statuses and process exit codes via `StructuredError`

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `issue_api` operations.
#[derive(Error, Debug)]
pub enum IssueError {
    // === Issue Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    // === Request Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Request body could not be read as JSON at all.
    #[error("Malformed request body: {reason}")]
    MalformedBody { reason: String, unsupported_media: bool },

    // === Storage Errors ===
    /// Failed to parse a line in the JSONL file.
    #[error("JSONL parse error in '{path}' at line {line}: {reason}")]
    JsonlParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    // === Configuration Errors ===
    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A blocking storage task panicked or was cancelled.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The reason for the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl IssueError {
    /// Can the client fix this without a server-side change?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::IssueNotFound { .. }
                | Self::Validation { .. }
                | Self::ValidationErrors { .. }
                | Self::MalformedBody { .. }
                | Self::Config(_)
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::IssueNotFound { .. } => Some("List issues with GET /api/v1/issues/"),
            Self::MalformedBody {
                unsupported_media: true,
                ..
            } => Some("Send the body with 'Content-Type: application/json'"),
            Self::MalformedBody { .. } => Some("Send a well-formed JSON object"),
            Self::JsonlParse { .. } => Some("Fix or remove the offending line in the data file"),
            Self::Config(_) => Some("Check issue-api.yaml and ISSUE_API_* variables"),
            _ => None,
        }
    }

    /// Create a not-found error for an issue id.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::IssueNotFound { id: id.into() }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create from multiple validation errors.
    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `IssueError`.
pub type Result<T> = std::result::Result<T, IssueError>;
