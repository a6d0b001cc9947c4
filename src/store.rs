//! Persistent task store.
//!
//! The whole task list lives in one JSON file; there is no per-task
//! record on disk. Every mutation follows the same cycle: read the entire
//! list, change it in memory, write the entire list back atomically. The
//! cycle runs under an exclusive lock on a sibling `.lock` file, so
//! concurrent processes queue instead of overwriting each other's edits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::lock::{self, FileLock};
use crate::task::Task;

/// Store file name inside the data directory.
pub const STORE_FILE: &str = "tasks.json";

/// Handle to the task list file.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl TaskStore {
    pub fn new(path: PathBuf, lock_timeout_ms: u64) -> Self {
        Self {
            path,
            lock_timeout_ms,
        }
    }

    /// Path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path to the lock file guarding mutations.
    pub fn lock_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.lock", self.path.display()))
    }

    /// Read the full task list. A missing file is an empty list.
    ///
    /// Reads take no lock: writers only ever rename a fully written temp
    /// file into place, so a read sees either the old list or the new one.
    pub fn load(&self) -> Result<Vec<Task>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        Ok(tasks)
    }

    /// Replace the stored list under the store lock.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let _guard = FileLock::acquire(self.lock_path(), self.lock_timeout_ms)?;
        self.write_list(tasks)
    }

    /// Run one read-modify-write cycle under the store lock.
    ///
    /// `mutate` receives the current list and reports whether it changed
    /// anything; the file is rewritten only on `Ok(true)`. Returns the
    /// post-mutation list either way.
    pub fn update<F>(&self, mutate: F) -> Result<Vec<Task>>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<bool>,
    {
        let _guard = FileLock::acquire(self.lock_path(), self.lock_timeout_ms)?;
        let mut tasks = self.load()?;
        let changed = mutate(&mut tasks)?;
        if changed {
            self.write_list(&tasks)?;
        }
        Ok(tasks)
    }

    fn write_list(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        lock::write_atomic(&self.path, json.as_bytes())
    }
}
