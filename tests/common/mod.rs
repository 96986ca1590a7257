#![allow(dead_code)]

use std::sync::Once;
use std::time::Instant;
use tempfile::TempDir;
use tracing::info;

pub mod fixtures;
pub mod http;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        issue_api::logging::init_test_logging();
    });
}

pub struct TestLogGuard {
    name: String,
    start: Instant,
}

impl TestLogGuard {
    fn new(name: &str) -> Self {
        init_test_logging();
        info!("{name}: starting");
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for TestLogGuard {
    fn drop(&mut self) {
        info!(
            "{}: assertions passed (elapsed {:?})",
            self.name,
            self.start.elapsed()
        );
    }
}

pub fn test_log(name: &str) -> TestLogGuard {
    TestLogGuard::new(name)
}

/// Temp dir plus the path of a (not yet created) data file inside it.
pub fn test_data_file() -> (TempDir, std::path::PathBuf) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("issues.jsonl");
    (dir, path)
}
