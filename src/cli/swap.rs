//! tabq swap command implementation
//!
//! Exchanges the stored positions of two tasks. Unknown ids and a task
//! swapped with itself leave the list as it was.

use crate::controller;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

pub struct Options {
    pub store: TaskStore,
    pub task_id_a: String,
    pub task_id_b: String,
    pub output: OutputOptions,
}

pub fn run(opts: Options) -> Result<()> {
    let outcome = controller::swap(&opts.store, &opts.task_id_a, &opts.task_id_b)?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(opts.output, "swap", &outcome, Some(&human))?;

    Ok(())
}
