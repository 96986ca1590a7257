//! JSONL flat-file store: one issue per line, in collection order.
//!
//! | Path | Purpose |
//! |------|---------|
//! | `<data>` | The collection |
//! | `.<data>.*.tmp` | Per-save temp file, renamed over `<data>` |

use crate::error::{IssueError, Result};
use crate::model::Issue;
use crate::storage::IssueStore;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Issue store backed by a single JSONL file.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// Create a store over `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IssueStore for JsonlStore {
    fn load(&self) -> Result<Vec<Issue>> {
        let issues = read_issues_from_jsonl(&self.path)?;
        tracing::trace!(path = %self.path.display(), count = issues.len(), "Loaded issues");
        Ok(issues)
    }

    fn save(&self, issues: &[Issue]) -> Result<()> {
        write_issues_to_jsonl(&self.path, issues)?;
        tracing::trace!(path = %self.path.display(), count = issues.len(), "Saved issues");
        Ok(())
    }
}

/// Read all issues from a JSONL file.
///
/// A missing file is an empty collection. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a valid issue.
pub fn read_issues_from_jsonl(path: &Path) -> Result<Vec<Issue>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(IssueError::Io(e)),
    };

    let reader = BufReader::new(file);
    let mut issues = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let issue: Issue = serde_json::from_str(&line).map_err(|e| IssueError::JsonlParse {
            path: path.to_path_buf(),
            line: line_num + 1,
            reason: e.to_string(),
        })?;
        issues.push(issue);
    }

    Ok(issues)
}

/// Write `issues` to `path` through a temp file and an atomic rename.
///
/// # Errors
///
/// Returns an error if the parent directory, temp file or rename fails.
pub fn write_issues_to_jsonl(path: &Path, issues: &[Issue]) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        Some(_) => Path::new("."),
        None => {
            return Err(IssueError::Config(format!(
                "Invalid data path: {}",
                path.display()
            )));
        }
    };
    fs::create_dir_all(parent_dir)?;

    // Each save gets its own temp file so concurrent saves never share one.
    let mut temp = tempfile::Builder::new()
        .prefix(&temp_prefix_for(path))
        .suffix(".tmp")
        .tempfile_in(parent_dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        for issue in issues {
            let json = serde_json::to_string(issue)?;
            writeln!(writer, "{json}")?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| IssueError::Io(e.error))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        let _ = fs::set_permissions(path, perms);
    }

    Ok(())
}

fn temp_prefix_for(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(".{name}.")
}
