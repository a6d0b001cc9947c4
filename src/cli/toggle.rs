//! tabq toggle command implementation
//!
//! Flips a task between open and completed. Completing closes the task's
//! live tab when it still exists; reopening opens a fresh tab and records
//! its identity on the task.

use tokio::runtime::Runtime;

use crate::browser::CdpHost;
use crate::controller;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

pub struct Options {
    pub store: TaskStore,
    pub host: CdpHost,
    pub runtime: Runtime,
    pub task_id: String,
    pub output: OutputOptions,
}

pub fn run(opts: Options) -> Result<()> {
    let outcome = opts
        .runtime
        .block_on(controller::toggle(&opts.store, &opts.host, &opts.task_id))?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(opts.output, "toggle", &outcome, Some(&human))?;

    Ok(())
}
