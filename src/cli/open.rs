//! tabq open command implementation
//!
//! Brings the task's tab to the front. A live tab on the task's url is
//! reused first, then the stored tab hint, and only then is a new tab
//! opened. An unknown task id is reported but is not an error.

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
        .block_on(controller::open(&opts.store, &opts.host, &opts.task_id))?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(opts.output, "open", &outcome, Some(&human))?;

    Ok(())
}
