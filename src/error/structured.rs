//! Structured error output for API clients and the CLI.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - HTTP statuses and exit codes per code
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::IssueError;
use crate::model::{Priority, Status};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Fixed client-facing message for a missing issue.
pub const ISSUE_NOT_FOUND_MESSAGE: &str = "Issue not found";

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // === Issue Errors ===
    /// Issue with specified ID not found
    IssueNotFound,

    // === Request Errors ===
    /// Field validation failed
    ValidationFailed,
    /// Body is not valid JSON
    MalformedBody,
    /// Body was not sent as JSON
    UnsupportedMediaType,

    // === Storage Errors ===
    /// JSONL parse error
    JsonlParseError,

    // === Config Errors ===
    /// Configuration error
    ConfigError,

    // === I/O Errors ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,

    // === Internal Errors ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::MalformedBody => "MALFORMED_BODY",
            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Self::JsonlParseError => "JSONL_PARSE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Retryable means the client might succeed if it fixes the input and
    /// sends the request again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed | Self::MalformedBody | Self::UnsupportedMediaType
        )
    }

    /// HTTP status used when this error ends a request.
    ///
    /// Storage, config and internal failures are all 500s.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::IssueNotFound => StatusCode::NOT_FOUND,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedBody => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::JsonlParseError
            | Self::ConfigError
            | Self::IoError
            | Self::JsonError
            | Self::YamlError
            | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the process exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 3: Issue errors
    /// - 4: Request errors
    /// - 6: Storage errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::IssueNotFound => 3,
            Self::ValidationFailed | Self::MalformedBody | Self::UnsupportedMediaType => 4,
            Self::JsonlParseError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from an `IssueError`.
    #[must_use]
    pub fn from_error(err: &IssueError) -> Self {
        if let IssueError::IssueNotFound { id } = err {
            return Self::issue_not_found(id);
        }

        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Create the not-found error. The message is fixed; the id goes in context.
    #[must_use]
    pub fn issue_not_found(searched_id: &str) -> Self {
        Self {
            code: ErrorCode::IssueNotFound,
            message: ISSUE_NOT_FOUND_MESSAGE.to_string(),
            hint: Some("List issues with GET /api/v1/issues/".to_string()),
            retryable: false,
            context: Some(json!({ "searched_id": searched_id })),
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Convert to JSON value for output.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable terminal output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &IssueError) -> (ErrorCode, Option<Value>) {
        match err {
            IssueError::IssueNotFound { id } => {
                (ErrorCode::IssueNotFound, Some(json!({"searched_id": id})))
            }
            IssueError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            IssueError::ValidationErrors { errors } => {
                let errors: Vec<Value> = errors
                    .iter()
                    .map(|e| json!({"field": e.field, "reason": e.message}))
                    .collect();
                (ErrorCode::ValidationFailed, Some(json!({"errors": errors})))
            }
            IssueError::MalformedBody {
                unsupported_media, ..
            } => {
                if *unsupported_media {
                    (ErrorCode::UnsupportedMediaType, None)
                } else {
                    (ErrorCode::MalformedBody, None)
                }
            }
            IssueError::JsonlParse { path, line, .. } => (
                ErrorCode::JsonlParseError,
                Some(json!({"path": path.display().to_string(), "line": line})),
            ),
            IssueError::Config(_) => (ErrorCode::ConfigError, None),
            IssueError::Io(_) => (ErrorCode::IoError, None),
            IssueError::Json(_) => (ErrorCode::JsonError, None),
            IssueError::Yaml(_) => (ErrorCode::YamlError, None),
            IssueError::Internal(_) => (ErrorCode::InternalError, None),
        }
    }

    fn generate_hint(err: &IssueError) -> Option<String> {
        match err {
            IssueError::Validation { field, .. } => field_hint(field),
            IssueError::ValidationErrors { errors } => {
                let hints: Vec<String> = errors
                    .iter()
                    .filter_map(|e| field_hint(&e.field))
                    .collect();
                if hints.is_empty() {
                    None
                } else {
                    Some(hints.join("; "))
                }
            }
            other => other.suggestion().map(ToString::to_string),
        }
    }
}

fn field_hint(field: &str) -> Option<String> {
    match field {
        "status" => Some(format!(
            "Valid statuses: {}",
            join_values(Status::ALL.iter().map(Status::as_str))
        )),
        "priority" => Some(format!(
            "Valid priorities: {}",
            join_values(Priority::ALL.iter().map(Priority::as_str))
        )),
        "title" => Some("Title must be non-empty and at most 500 characters".to_string()),
        "description" => Some("Description must be at most 100KB".to_string()),
        _ => None,
    }
}

fn join_values<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn not_found_message_is_fixed() {
        let structured = StructuredError::from_error(&IssueError::not_found("abc"));
        assert_eq!(structured.code, ErrorCode::IssueNotFound);
        assert_eq!(structured.message, ISSUE_NOT_FOUND_MESSAGE);
        assert_eq!(structured.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            structured.context,
            Some(json!({"searched_id": "abc"}))
        );
        assert!(!structured.retryable);
    }

    #[test]
    fn validation_maps_to_422_with_hint() {
        let err = IssueError::validation("priority", "unknown priority 'urgent'");
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::ValidationFailed);
        assert_eq!(structured.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(structured.retryable);
        assert_eq!(
            structured.hint.as_deref(),
            Some("Valid priorities: low, medium, high")
        );
    }

    #[test]
    fn multiple_validation_errors_keep_every_field() {
        let err = IssueError::from_validation_errors(vec![
            ValidationError::new("title", "cannot be empty"),
            ValidationError::new("status", "unknown"),
        ]);
        let structured = StructuredError::from_error(&err);
        let errors = structured.context.unwrap()["errors"].clone();
        assert_eq!(errors.as_array().map(Vec::len), Some(2));
        assert!(structured.hint.unwrap().contains("Valid statuses"));
    }

    #[test]
    fn storage_errors_are_internal() {
        let err = IssueError::Io(std::io::Error::other("disk full"));
        let structured = StructuredError::from_error(&err);
        assert_eq!(structured.code, ErrorCode::IoError);
        assert_eq!(structured.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(structured.code.exit_code(), 8);
    }

    #[test]
    fn malformed_body_distinguishes_media_type() {
        let err = IssueError::MalformedBody {
            reason: "missing content type".to_string(),
            unsupported_media: true,
        };
        assert_eq!(
            StructuredError::from_error(&err).http_status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );

        let err = IssueError::MalformedBody {
            reason: "EOF".to_string(),
            unsupported_media: false,
        };
        assert_eq!(
            StructuredError::from_error(&err).http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn to_json_wraps_in_error_object() {
        let json = StructuredError::issue_not_found("x").to_json();
        assert_eq!(json["error"]["code"], "ISSUE_NOT_FOUND");
        assert_eq!(json["error"]["message"], "Issue not found");
    }

    #[test]
    fn to_human_without_color() {
        let human = StructuredError::issue_not_found("x").to_human(false);
        assert!(human.starts_with("Error: Issue not found"));
        assert!(human.contains("Hint: "));
    }
}
