//! Core data types for `issue_api`.
//!
//! - `Issue` - The stored work item
//! - `Status` - Issue lifecycle states
//! - `Priority` - Issue urgency
//! - `NewIssue` / `IssueUpdate` - Request bodies for create and update

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Issue lifecycle status.
///
/// Transitions are unrestricted; `Open` is only the creation default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked issue as persisted and returned over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Opaque identifier, assigned once at creation.
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

impl Issue {
    /// Build a fresh issue from a create request.
    ///
    /// The id is a new random UUID and the status is always `Open`.
    #[must_use]
    pub fn from_new(new: NewIssue) -> Self {
        Self {
            id: new_issue_id(),
            title: new.title,
            description: new.description,
            priority: new.priority,
            status: Status::Open,
        }
    }

    /// Overwrite every field present in `update`. The id is never touched.
    pub fn apply(&mut self, update: &IssueUpdate) {
        if let Some(title) = &update.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &update.description {
            self.description.clone_from(description);
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// Body of a create request.
///
/// Unknown fields (including `status`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl NewIssue {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
        }
    }
}

/// Body of an update request. Absent or `null` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl IssueUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}

/// Generate a fresh issue id (random UUID v4, hyphenated lowercase).
#[must_use]
pub fn new_issue_id() -> String {
    Uuid::new_v4().to_string()
}
