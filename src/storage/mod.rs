//! Persistence boundary for the issue collection.
//!
//! The whole collection is the unit of persistence: callers `load` it, change
//! it in memory and `save` it back. Stores make each call atomic on its own;
//! they do not serialize a load/save pair across callers.

mod jsonl;
mod memory;

pub use jsonl::{JsonlStore, read_issues_from_jsonl, write_issues_to_jsonl};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::model::Issue;

/// Load/save contract over the full, ordered issue collection.
pub trait IssueStore: Send + Sync {
    /// Read the whole collection in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or decoded.
    fn load(&self) -> Result<Vec<Issue>>;

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, issues: &[Issue]) -> Result<()>;
}
