//! Task records and the pure list operations over them.
//!
//! A task tracks one browser tab the user chose to keep. The stored list's
//! order is the display order; there is no separate rank field.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(TaskStatus::Open),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status '{s}': must be open or completed"
            ))),
        }
    }
}

/// One tracked tab.
///
/// Field names in the stored JSON keep the camelCase shape (`favIconUrl`,
/// `tabId`, `createdAt`) so the file reads the same way the records do in
/// the browser's own tab listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, immutable; `{timestamp_millis}-{index}` within a snapshot batch.
    pub id: String,
    /// Display string; already fell back to the url when the tab had none.
    pub title: String,
    pub url: String,
    /// Possibly empty; cosmetic only.
    #[serde(default)]
    pub fav_icon_url: String,
    /// Hint at the last known live-tab identifier. Never authoritative:
    /// the browser recycles identifiers once a tab closes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
    pub status: TaskStatus,
    /// Epoch milliseconds, shared by every task of one snapshot batch.
    pub created_at: i64,
}

impl Task {
    /// Title for display, falling back to the url when empty.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Current time as epoch milliseconds, the batch timestamp unit.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Task id for the `index`-th member of a snapshot batch taken at
/// `created_at`. Unique within the batch by construction.
pub fn batch_id(created_at: i64, index: usize) -> String {
    format!("{created_at}-{index}")
}

/// Index of the task with the given id, if present.
pub fn find_task(tasks: &[Task], id: &str) -> Option<usize> {
    tasks.iter().position(|task| task.id == id)
}

/// Swap the positions of two tasks. Returns false without touching the
/// list when either id is absent or both name the same task.
pub fn swap_tasks(tasks: &mut [Task], id_a: &str, id_b: &str) -> bool {
    let Some(a) = find_task(tasks, id_a) else {
        return false;
    };
    let Some(b) = find_task(tasks, id_b) else {
        return false;
    };
    if a == b {
        return false;
    }
    tasks.swap(a, b);
    true
}

/// Remove the task with the given id. Returns whether anything was removed.
pub fn remove_task(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    tasks.len() != before
}

/// Remove every completed task in one pass. Returns how many were removed.
pub fn clear_completed(tasks: &mut Vec<Task>) -> usize {
    let before = tasks.len();
    tasks.retain(|task| !task.is_completed());
    before - tasks.len()
}
