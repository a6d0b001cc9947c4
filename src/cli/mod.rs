//! Command-line interface for tabq
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command's handler lives in its own submodule.

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::browser::CdpHost;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::store::TaskStore;

mod clear;
mod list;
mod open;
mod rm;
mod snapshot;
mod swap;
mod toggle;
mod ui;

/// tabq - tab queue
///
/// Captures the open tabs of a running browser into a persisted task
/// list, then works the list down: focus a task's tab, complete it,
/// reopen it, reorder, delete.
#[derive(Parser, Debug)]
#[command(name = "tabq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Browser remote debugging endpoint
    #[arg(long = "browser-url", global = true, env = "TABQ_BROWSER_URL")]
    pub browser_url: Option<String>,

    /// Task store file (defaults to the user data directory)
    #[arg(long, global = true, env = "TABQ_STORE")]
    pub store: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture every open tab as a new task
    Snapshot,

    /// List tasks in stored order
    List {
        /// Only show tasks with this status: open or completed
        #[arg(long)]
        status: Option<String>,
    },

    /// Focus the task's tab, opening a new one if needed
    Open {
        /// Task id
        task_id: String,
    },

    /// Complete an open task (closing its tab) or reopen a completed one
    Toggle {
        /// Task id
        task_id: String,
    },

    /// Delete a task; its tab stays open
    Rm {
        /// Task id
        task_id: String,
    },

    /// Delete every completed task
    Clear,

    /// Swap the positions of two tasks
    Swap {
        /// First task id
        task_id_a: String,

        /// Second task id
        task_id_b: String,
    },

    /// Interactive task list
    Ui,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let store = self.resolve_store(&config)?;
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Snapshot => snapshot::run(snapshot::Options {
                store,
                host: CdpHost::new(&config.browser)?,
                runtime: Runtime::new()?,
                output,
            }),
            Commands::List { status } => list::run(list::Options {
                store,
                status,
                verbose: self.verbose,
                output,
            }),
            Commands::Open { task_id } => open::run(open::Options {
                store,
                host: CdpHost::new(&config.browser)?,
                runtime: Runtime::new()?,
                task_id,
                output,
            }),
            Commands::Toggle { task_id } => toggle::run(toggle::Options {
                store,
                host: CdpHost::new(&config.browser)?,
                runtime: Runtime::new()?,
                task_id,
                output,
            }),
            Commands::Rm { task_id } => rm::run(rm::Options {
                store,
                task_id,
                output,
            }),
            Commands::Clear => clear::run(clear::Options { store, output }),
            Commands::Swap {
                task_id_a,
                task_id_b,
            } => swap::run(swap::Options {
                store,
                task_id_a,
                task_id_b,
                output,
            }),
            Commands::Ui => ui::run(ui::Options {
                store,
                host: CdpHost::new(&config.browser)?,
                runtime: Runtime::new()?,
            }),
        }
    }

    fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default()?;
        if let Some(url) = &self.browser_url {
            config::validate_endpoint(url)?;
            config.browser.endpoint = url.clone();
        }
        Ok(config)
    }

    fn resolve_store(&self, config: &Config) -> Result<TaskStore> {
        let path = self
            .store
            .clone()
            .or_else(|| config.store.path.clone())
            .or_else(config::default_store_path)
            .ok_or_else(|| {
                Error::InvalidConfig(
                    "cannot determine store path; set --store, TABQ_STORE, or store.path in tabq.toml"
                        .to_string(),
                )
            })?;
        Ok(TaskStore::new(path, config.store.lock_timeout_ms))
    }
}
