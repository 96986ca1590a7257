#![allow(dead_code)]

use issue_api::model::{Issue, IssueUpdate, NewIssue, Priority, Status};
use serde_json::{Value, json};

pub fn new_issue(title: &str) -> NewIssue {
    NewIssue::new(title, format!("{title} description"), Priority::Medium)
}

pub fn issue(id: &str, title: &str) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        priority: Priority::Medium,
        status: Status::Open,
    }
}

pub fn status_update(status: Status) -> IssueUpdate {
    IssueUpdate {
        status: Some(status),
        ..IssueUpdate::default()
    }
}

/// Create body used by the end-to-end scenarios.
pub fn bug_a_body() -> Value {
    json!({"title": "Bug A", "description": "desc", "priority": "high"})
}
