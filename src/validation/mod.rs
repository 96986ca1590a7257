//! Validation helpers for request bodies.
//!
//! serde already enforces required fields and the closed enumerations; these
//! routines add the field-content rules and return every violation at once
//! without touching storage.

use crate::error::{IssueError, ValidationError};
use crate::model::{IssueUpdate, NewIssue};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 500;
/// Maximum description length in bytes (100KB).
pub const MAX_DESCRIPTION_LEN: usize = 102_400;

/// Validates create and update payloads.
pub struct IssueValidator;

impl IssueValidator {
    /// Validate a create request.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_new(new: &NewIssue) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_title(&new.title, &mut errors);
        check_description(&new.description, &mut errors);
        finish(errors)
    }

    /// Validate an update request. Only fields that are present are checked.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_update(update: &IssueUpdate) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Some(title) = &update.title {
            check_title(title, &mut errors);
        }
        if let Some(description) = &update.description {
            check_description(description, &mut errors);
        }
        finish(errors)
    }
}

/// Validate a create request, converting violations into an `IssueError`.
///
/// # Errors
///
/// Returns `IssueError::Validation` or `IssueError::ValidationErrors`.
pub fn ensure_valid_new(new: &NewIssue) -> Result<(), IssueError> {
    IssueValidator::validate_new(new).map_err(IssueError::from_validation_errors)
}

/// Validate an update request, converting violations into an `IssueError`.
///
/// # Errors
///
/// Returns `IssueError::Validation` or `IssueError::ValidationErrors`.
pub fn ensure_valid_update(update: &IssueUpdate) -> Result<(), IssueError> {
    IssueValidator::validate_update(update).map_err(IssueError::from_validation_errors)
}

fn check_title(title: &str, errors: &mut Vec<ValidationError>) {
    if title.trim().is_empty() {
        errors.push(ValidationError::new("title", "cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        errors.push(ValidationError::new("title", "exceeds 500 characters"));
    }
}

fn check_description(description: &str, errors: &mut Vec<ValidationError>) {
    if description.len() > MAX_DESCRIPTION_LEN {
        errors.push(ValidationError::new("description", "exceeds 100KB"));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};

    #[test]
    fn valid_new_issue_passes() {
        let new = NewIssue::new("Bug A", "desc", Priority::High);
        assert!(IssueValidator::validate_new(&new).is_ok());
    }

    #[test]
    fn empty_description_is_allowed() {
        let new = NewIssue::new("Bug A", "", Priority::Low);
        assert!(IssueValidator::validate_new(&new).is_ok());
    }

    #[test]
    fn blank_title_rejected() {
        let new = NewIssue::new("   ", "desc", Priority::High);
        let errors = IssueValidator::validate_new(&new).unwrap_err();
        assert_eq!(errors, vec![ValidationError::new("title", "cannot be empty")]);
    }

    #[test]
    fn all_violations_reported() {
        let new = NewIssue::new(
            "x".repeat(MAX_TITLE_LEN + 1),
            "y".repeat(MAX_DESCRIPTION_LEN + 1),
            Priority::Medium,
        );
        let errors = IssueValidator::validate_new(&new).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description"]);
    }

    #[test]
    fn update_checks_only_present_fields() {
        let update = IssueUpdate {
            status: Some(Status::Closed),
            ..IssueUpdate::default()
        };
        assert!(IssueValidator::validate_update(&update).is_ok());

        let update = IssueUpdate {
            title: Some(String::new()),
            ..IssueUpdate::default()
        };
        let err = ensure_valid_update(&update).unwrap_err();
        assert!(matches!(err, IssueError::Validation { field, .. } if field == "title"));
    }

    #[test]
    fn title_limit_counts_characters() {
        let at_limit = "é".repeat(MAX_TITLE_LEN);
        assert!(at_limit.len() > MAX_TITLE_LEN);
        let new = NewIssue::new(at_limit, "d", Priority::Low);
        assert!(IssueValidator::validate_new(&new).is_ok());

        let over = NewIssue::new("é".repeat(MAX_TITLE_LEN + 1), "d", Priority::Low);
        let errors = IssueValidator::validate_new(&over).unwrap_err();
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "exceeds 500 characters");
    }
}
