//! tabq - Tab Queue Library
//!
//! This library backs the tabq CLI, which captures a browser's open tabs
//! into a persisted task list and drives the browser back from that list.
//!
//! # Core Concepts
//!
//! - **Tasks**: One captured tab each: title, url, status, and a tab-id hint
//! - **Snapshots**: One batch capture of every open tab, appended in order
//! - **Focus-or-open**: Reuse a live tab for a task before creating a new one
//! - **The store**: A single JSON file guarded by a lock for cross-process use
//!
//! # Module Organization
//!
//! - `browser`: The `TabHost` trait and the DevTools HTTP client
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `tabq.toml`
//! - `controller`: Task operations shared by the CLI and the TUI
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for concurrency safety
//! - `output`: Human and JSON result emission
//! - `store`: The persisted task list
//! - `task`: Task records and list edits
//! - `tui`: Interactive terminal task list

pub mod browser;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod lock;
pub mod output;
pub mod store;
pub mod task;
pub mod tui;

pub use error::{Error, Result};
