//! `issue_api` - a minimal issue-tracking HTTP API.
//!
//! Issues live in a single JSONL file. Every request loads the whole
//! collection, works on it in memory and, for mutations, writes the whole
//! collection back.
//!
//! - [`service::IssueService`] - list, create, get, update, delete
//! - [`storage::IssueStore`] - the load/save boundary ([`storage::JsonlStore`],
//!   [`storage::MemoryStore`])
//! - [`server`] - axum routes under `/api/v1/issues`

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod server;
pub mod service;
pub mod storage;
pub mod validation;

pub use error::{ErrorCode, IssueError, Result, StructuredError};
