//! Task operations shared by the CLI and the TUI.
//!
//! Each operation follows the same shape: read the stored list, talk to
//! the browser when the operation involves live tabs, then persist the
//! updated list under the store lock. Failures to activate or close a tab
//! are ignored; an unreachable endpoint aborts the whole operation.

use serde::Serialize;
use tracing::debug;

use crate::browser::{LiveTab, TabHost};
use crate::error::Result;
use crate::store::TaskStore;
use crate::task::{self, Task, TaskStatus};

/// Result of one task mutation, for rendering by either front end.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub changed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl ActionOutcome {
    fn not_found(task_id: &str) -> Self {
        Self {
            changed: false,
            message: format!("no task with id {task_id}"),
            task_id: None,
        }
    }
}

/// Result of capturing the open tabs.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotOutcome {
    pub added: usize,
    pub total: usize,
}

/// Result of clearing completed tasks.
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutcome {
    pub removed: usize,
    pub remaining: usize,
}

/// Current task list in stored order.
pub fn list(store: &TaskStore) -> Result<Vec<Task>> {
    store.load()
}

/// Capture every open tab as a batch of new open tasks.
///
/// Appends unconditionally: capturing the same url twice gives two tasks.
/// The whole batch shares one timestamp, and ids are position-derived, so
/// a batch is internally unique by construction.
pub async fn snapshot<H: TabHost>(store: &TaskStore, host: &H) -> Result<SnapshotOutcome> {
    let tabs = host.list_tabs().await?;
    let created_at = task::now_millis();
    let added = tabs.len();
    debug!(added, "captured open tabs");

    let tasks = store.update(|tasks| {
        for (index, tab) in tabs.iter().enumerate() {
            tasks.push(task_from_tab(tab, created_at, index));
        }
        Ok(added > 0)
    })?;

    Ok(SnapshotOutcome {
        added,
        total: tasks.len(),
    })
}

/// Bring the task's tab to the front, reusing live tabs before opening one.
///
/// A tab whose url matches the task wins over the stored tab hint, which
/// wins over creating a fresh tab. Whichever tab it ends up on, the task's
/// hint is repointed there and persisted, even when activation itself
/// failed along the way.
pub async fn open<H: TabHost>(store: &TaskStore, host: &H, task_id: &str) -> Result<ActionOutcome> {
    let tasks = store.load()?;
    let Some(target) = tasks.iter().find(|t| t.id == task_id) else {
        return Ok(ActionOutcome::not_found(task_id));
    };

    let (live, verb) = match host.find_by_url(&target.url).await? {
        Some(tab) => {
            focus(host, &tab).await;
            (tab, "focused")
        }
        None => {
            let hinted = match target.tab_id.as_deref() {
                Some(hint) => host.get_tab(hint).await?,
                None => None,
            };
            match hinted {
                Some(tab) => {
                    focus(host, &tab).await;
                    (tab, "focused")
                }
                // A created tab comes up in the foreground on its own.
                None => (host.create_tab(&target.url).await?, "opened"),
            }
        }
    };

    let new_tab_id = live.id;
    let mut updated = false;
    store.update(|tasks| {
        if let Some(pos) = task::find_task(tasks, task_id) {
            tasks[pos].tab_id = Some(new_tab_id);
            updated = true;
        }
        Ok(updated)
    })?;
    if !updated {
        return Ok(ActionOutcome::not_found(task_id));
    }

    Ok(ActionOutcome {
        changed: true,
        message: format!("{verb} {}", target.url),
        task_id: Some(task_id.to_string()),
    })
}

/// Complete an open task, or reopen a completed one.
///
/// Completing closes the task's live tab when the hint still resolves and
/// keeps the hint in place. Reopening opens a fresh tab on the task's url
/// and captures that tab's identity as the new hint.
pub async fn toggle<H: TabHost>(
    store: &TaskStore,
    host: &H,
    task_id: &str,
) -> Result<ActionOutcome> {
    let tasks = store.load()?;
    let Some(target) = tasks.iter().find(|t| t.id == task_id) else {
        return Ok(ActionOutcome::not_found(task_id));
    };

    let (next_status, next_tab_id, message) = match target.status {
        TaskStatus::Open => {
            if let Some(hint) = target.tab_id.as_deref() {
                // The tab may be long gone; completion happens regardless.
                if let Err(err) = host.close_tab(hint).await {
                    debug!(%hint, %err, "close failed, completing anyway");
                }
            }
            (
                TaskStatus::Completed,
                target.tab_id.clone(),
                format!("completed {task_id}"),
            )
        }
        TaskStatus::Completed => {
            let tab = host.create_tab(&target.url).await?;
            (
                TaskStatus::Open,
                Some(tab.id),
                format!("reopened {task_id}"),
            )
        }
    };

    let mut updated = false;
    store.update(|tasks| {
        if let Some(pos) = task::find_task(tasks, task_id) {
            tasks[pos].status = next_status;
            tasks[pos].tab_id = next_tab_id;
            updated = true;
        }
        Ok(updated)
    })?;
    if !updated {
        return Ok(ActionOutcome::not_found(task_id));
    }

    Ok(ActionOutcome {
        changed: true,
        message,
        task_id: Some(task_id.to_string()),
    })
}

/// Delete a task. Its live tab, if any, stays open.
pub fn remove(store: &TaskStore, task_id: &str) -> Result<ActionOutcome> {
    let mut removed = false;
    store.update(|tasks| {
        removed = task::remove_task(tasks, task_id);
        Ok(removed)
    })?;

    if removed {
        Ok(ActionOutcome {
            changed: true,
            message: format!("deleted {task_id}"),
            task_id: Some(task_id.to_string()),
        })
    } else {
        Ok(ActionOutcome::not_found(task_id))
    }
}

/// Drop every completed task in one pass.
pub fn clear_completed(store: &TaskStore) -> Result<ClearOutcome> {
    let mut removed = 0;
    let tasks = store.update(|tasks| {
        removed = task::clear_completed(tasks);
        Ok(removed > 0)
    })?;

    Ok(ClearOutcome {
        removed,
        remaining: tasks.len(),
    })
}

/// Swap two tasks' positions. Unknown ids and self swaps change nothing.
pub fn swap(store: &TaskStore, id_a: &str, id_b: &str) -> Result<ActionOutcome> {
    let mut swapped = false;
    store.update(|tasks| {
        swapped = task::swap_tasks(tasks, id_a, id_b);
        Ok(swapped)
    })?;

    if swapped {
        Ok(ActionOutcome {
            changed: true,
            message: format!("swapped {id_a} and {id_b}"),
            task_id: None,
        })
    } else {
        Ok(ActionOutcome {
            changed: false,
            message: "nothing to swap".to_string(),
            task_id: None,
        })
    }
}

fn task_from_tab(tab: &LiveTab, created_at: i64, index: usize) -> Task {
    let title = if tab.title.trim().is_empty() {
        tab.url.clone()
    } else {
        tab.title.clone()
    };
    Task {
        id: task::batch_id(created_at, index),
        title,
        url: tab.url.clone(),
        fav_icon_url: tab.fav_icon_url.clone().unwrap_or_default(),
        tab_id: Some(tab.id.clone()),
        status: TaskStatus::Open,
        created_at,
    }
}

/// Raise a live tab. Activation failure means the tab vanished mid-flight;
/// window focus is only attempted after a successful activation, and only
/// when the host knows the window.
async fn focus<H: TabHost>(host: &H, tab: &LiveTab) {
    if host.activate_tab(&tab.id).await.is_err() {
        return;
    }
    if let Some(window_id) = tab.window_id.as_deref() {
        let _ = host.focus_window(window_id).await;
    }
}
