//! The issue handler set: list, create, get, update and delete.
//!
//! Every operation loads the full collection, works on it in memory and, when
//! it mutates, saves the full collection back. Nothing is written when an
//! operation fails. No lock spans the load/save pair, so concurrent mutations
//! may overwrite each other.

use crate::error::{IssueError, Result};
use crate::model::{Issue, IssueUpdate, NewIssue};
use crate::storage::IssueStore;
use std::sync::Arc;

/// CRUD operations over an [`IssueStore`].
#[derive(Clone)]
pub struct IssueService {
    store: Arc<dyn IssueStore>,
}

impl std::fmt::Debug for IssueService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueService").finish_non_exhaustive()
    }
}

impl IssueService {
    #[must_use]
    pub fn new(store: Arc<dyn IssueStore>) -> Self {
        Self { store }
    }

    /// Return the whole collection in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn list(&self) -> Result<Vec<Issue>> {
        let issues = self.store.load()?;
        tracing::debug!(count = issues.len(), "Listed issues");
        Ok(issues)
    }

    /// Create an issue with a fresh id and `open` status, append it and save.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn create(&self, new: NewIssue) -> Result<Issue> {
        let mut issues = self.store.load()?;
        let issue = Issue::from_new(new);
        issues.push(issue.clone());
        self.store.save(&issues)?;

        tracing::info!(id = %issue.id, priority = %issue.priority, "Created issue");
        Ok(issue)
    }

    /// Fetch the first issue whose id matches.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if no issue has this id, or a storage error.
    pub fn get(&self, id: &str) -> Result<Issue> {
        let issues = self.store.load()?;
        issues
            .into_iter()
            .find(|issue| issue.id == id)
            .ok_or_else(|| IssueError::not_found(id))
    }

    /// Overwrite the fields present in `update` and save.
    ///
    /// An empty update still writes the (unchanged) collection back.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` (without writing) if no issue has this id, or a
    /// storage error.
    pub fn update(&self, id: &str, update: &IssueUpdate) -> Result<Issue> {
        let mut issues = self.store.load()?;
        let issue = issues
            .iter_mut()
            .find(|issue| issue.id == id)
            .ok_or_else(|| IssueError::not_found(id))?;

        issue.apply(update);
        let updated = issue.clone();
        self.store.save(&issues)?;

        tracing::info!(id = %id, empty = update.is_empty(), "Updated issue");
        Ok(updated)
    }

    /// Remove the issue and save the shortened collection.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` (without writing) if no issue has this id, or a
    /// storage error.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut issues = self.store.load()?;
        let index = issues
            .iter()
            .position(|issue| issue.id == id)
            .ok_or_else(|| IssueError::not_found(id))?;

        issues.remove(index);
        self.store.save(&issues)?;

        tracing::info!(id = %id, remaining = issues.len(), "Deleted issue");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};
    use crate::storage::MemoryStore;

    fn service() -> (IssueService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (IssueService::new(store.clone()), store)
    }

    fn bug(title: &str) -> NewIssue {
        NewIssue::new(title, "desc", Priority::High)
    }

    #[test]
    fn list_empty() {
        let (service, _) = service();
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn create_appends_in_order_and_saves_once() {
        let (service, store) = service();
        let a = service.create(bug("A")).unwrap();
        let b = service.create(bug("B")).unwrap();

        assert_eq!(store.save_count(), 2);
        assert_eq!(service.list().unwrap(), vec![a, b]);
    }

    #[test]
    fn create_forces_open_status() {
        let (service, _) = service();
        let issue = service.create(bug("A")).unwrap();
        assert_eq!(issue.status, Status::Open);
        assert_eq!(service.get(&issue.id).unwrap(), issue);
    }

    #[test]
    fn get_unknown_is_not_found() {
        let (service, _) = service();
        service.create(bug("A")).unwrap();
        let err = service.get("missing").unwrap_err();
        assert!(matches!(err, IssueError::IssueNotFound { id } if id == "missing"));
    }

    #[test]
    fn update_changes_subset() {
        let (service, _) = service();
        let issue = service.create(bug("A")).unwrap();

        let updated = service
            .update(
                &issue.id,
                &IssueUpdate {
                    title: Some("A2".to_string()),
                    status: Some(Status::InProgress),
                    ..IssueUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, issue.id);
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.description, issue.description);
        assert_eq!(updated.priority, issue.priority);
        assert_eq!(service.get(&issue.id).unwrap(), updated);
    }

    #[test]
    fn empty_update_still_writes_through() {
        let (service, store) = service();
        let issue = service.create(bug("A")).unwrap();
        let before = store.snapshot().unwrap();

        let returned = service.update(&issue.id, &IssueUpdate::default()).unwrap();

        assert_eq!(returned, issue);
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn status_can_move_backwards() {
        let (service, _) = service();
        let issue = service.create(bug("A")).unwrap();
        let closed = IssueUpdate {
            status: Some(Status::Closed),
            ..IssueUpdate::default()
        };
        let reopened = IssueUpdate {
            status: Some(Status::Open),
            ..IssueUpdate::default()
        };
        service.update(&issue.id, &closed).unwrap();
        let back = service.update(&issue.id, &reopened).unwrap();
        assert_eq!(back.status, Status::Open);
    }

    #[test]
    fn update_unknown_does_not_write() {
        let (service, store) = service();
        service.create(bug("A")).unwrap();

        let err = service
            .update("missing", &IssueUpdate::default())
            .unwrap_err();

        assert!(matches!(err, IssueError::IssueNotFound { .. }));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn delete_removes_and_shifts() {
        let (service, _) = service();
        let a = service.create(bug("A")).unwrap();
        let b = service.create(bug("B")).unwrap();
        let c = service.create(bug("C")).unwrap();

        service.delete(&b.id).unwrap();

        assert_eq!(service.list().unwrap(), vec![a, c]);
        assert!(matches!(
            service.get(&b.id).unwrap_err(),
            IssueError::IssueNotFound { .. }
        ));
    }

    #[test]
    fn delete_unknown_does_not_write() {
        let (service, store) = service();
        let err = service.delete("missing").unwrap_err();
        assert!(matches!(err, IssueError::IssueNotFound { .. }));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn get_returns_first_match_on_duplicate_ids() {
        let first = Issue::from_new(bug("first"));
        let mut second = Issue::from_new(bug("second"));
        second.id.clone_from(&first.id);
        let store = Arc::new(MemoryStore::with_issues(vec![first.clone(), second]));
        let service = IssueService::new(store);

        assert_eq!(service.get(&first.id).unwrap().title, "first");
    }
}
