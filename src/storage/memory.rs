//! In-memory issue store.
//!
//! Keeps the collection in a mutex-guarded `Vec` and counts saves, so callers
//! can assert when a write did or did not happen.

use crate::error::{IssueError, Result};
use crate::model::Issue;
use crate::storage::IssueStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryStore {
    issues: Mutex<Vec<Issue>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing collection.
    #[must_use]
    pub fn with_issues(issues: Vec<Issue>) -> Self {
        Self {
            issues: Mutex::new(issues),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed `save` calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the current collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<Issue>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Issue>>> {
        self.issues
            .lock()
            .map_err(|_| IssueError::Internal("memory store lock poisoned".to_string()))
    }
}

impl IssueStore for MemoryStore {
    fn load(&self) -> Result<Vec<Issue>> {
        self.snapshot()
    }

    fn save(&self, issues: &[Issue]) -> Result<()> {
        let mut guard = self.lock()?;
        *guard = issues.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
