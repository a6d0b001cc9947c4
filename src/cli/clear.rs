//! tabq clear command implementation

use crate::controller;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

pub struct Options {
    pub store: TaskStore,
    pub output: OutputOptions,
}

pub fn run(opts: Options) -> Result<()> {
    let outcome = controller::clear_completed(&opts.store)?;

    let header = if outcome.removed == 0 {
        "No completed tasks to clear".to_string()
    } else {
        format!("Cleared {} completed task(s)", outcome.removed)
    };

    let mut human = HumanOutput::new(header);
    human.push_fact("removed", outcome.removed.to_string());
    human.push_fact("remaining", outcome.remaining.to_string());

    emit_success(opts.output, "clear", &outcome, Some(&human))?;

    Ok(())
}
