//! Axum handlers for the issue endpoints.
//!
//! Each handler runs its service call on the blocking pool, since every
//! operation does whole-file storage I/O.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::AppState;
use crate::error::{IssueError, Result, StructuredError};
use crate::model::{Issue, IssueUpdate, NewIssue};
use crate::service::IssueService;
use crate::validation::{ensure_valid_new, ensure_valid_update};

impl IntoResponse for IssueError {
    fn into_response(self) -> Response {
        let structured = StructuredError::from_error(&self);
        let status = structured.http_status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = structured.code.as_str(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = structured.code.as_str(), "Request rejected");
        }
        (status, Json(structured.to_json())).into_response()
    }
}

impl From<JsonRejection> for IssueError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let text = err.body_text();
                let (field, reason) = rejected_field(&text);
                Self::validation(field, reason)
            }
            JsonRejection::MissingJsonContentType(err) => Self::MalformedBody {
                reason: err.body_text(),
                unsupported_media: true,
            },
            other => Self::MalformedBody {
                reason: other.body_text(),
                unsupported_media: false,
            },
        }
    }
}

/// Request body fields a deserialize failure can be pinned to.
const BODY_FIELDS: [&str; 4] = ["title", "description", "priority", "status"];

/// Split a JSON data rejection into the offending field and the serde reason.
///
/// The rejection text reads `<summary>: <path>: <reason>` for a bad value
/// and `<summary>: missing field ...` for an absent one. Anything
/// else is attributed to the whole body.
fn rejected_field(text: &str) -> (&'static str, String) {
    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);

    let missing = detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());
    if let Some(field) = missing.and_then(known_field) {
        return (field, detail.to_string());
    }

    let at_path = detail
        .split_once(": ")
        .and_then(|(path, reason)| known_field(path).map(|field| (field, reason)));
    if let Some((field, reason)) = at_path {
        return (field, reason.to_string());
    }

    ("body", detail.to_string())
}

fn known_field(name: &str) -> Option<&'static str> {
    BODY_FIELDS.into_iter().find(|field| *field == name)
}

async fn blocking<T, F>(state: &AppState, op: F) -> Result<T>
where
    F: FnOnce(&IssueService) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| IssueError::Internal(format!("storage task failed: {e}")))?
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

pub(super) async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

pub(super) async fn list_issues(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Issue>>> {
    let issues = blocking(&state, IssueService::list).await?;
    Ok(Json(issues))
}

pub(super) async fn create_issue(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewIssue>, JsonRejection>,
) -> Result<(StatusCode, Json<Issue>)> {
    let Json(new) = payload?;
    ensure_valid_new(&new)?;

    let issue = blocking(&state, move |service| service.create(new)).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub(super) async fn get_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<String>,
) -> Result<Json<Issue>> {
    let issue = blocking(&state, move |service| service.get(&issue_id)).await?;
    Ok(Json(issue))
}

pub(super) async fn update_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<String>,
    payload: std::result::Result<Json<IssueUpdate>, JsonRejection>,
) -> Result<Json<Issue>> {
    let Json(update) = payload?;
    ensure_valid_update(&update)?;

    let issue = blocking(&state, move |service| service.update(&issue_id, &update)).await?;
    Ok(Json(issue))
}

pub(super) async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<String>,
) -> Result<StatusCode> {
    blocking(&state, move |service| service.delete(&issue_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
