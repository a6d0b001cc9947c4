//! tabq rm command implementation

use crate::controller;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

pub struct Options {
    pub store: TaskStore,
    pub task_id: String,
    pub output: OutputOptions,
}

pub fn run(opts: Options) -> Result<()> {
    let outcome = controller::remove(&opts.store, &opts.task_id)?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(opts.output, "rm", &outcome, Some(&human))?;

    Ok(())
}
