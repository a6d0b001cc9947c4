//! tabq snapshot command implementation
//!
//! Captures every open tab as a new open task, appended to the stored
//! list. Nothing is deduplicated; snapshotting twice doubles the batch.

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
    pub output: OutputOptions,
}

pub fn run(opts: Options) -> Result<()> {
    let outcome = opts
        .runtime
        .block_on(controller::snapshot(&opts.store, &opts.host))?;

    let header = if outcome.added == 0 {
        "No open tabs to capture".to_string()
    } else {
        format!("Captured {} tab(s)", outcome.added)
    };

    let mut human = HumanOutput::new(header);
    human.push_fact("added", outcome.added.to_string());
    human.push_fact("total", outcome.total.to_string());
    if outcome.added > 0 {
        human.push_next_step("tabq list");
    }

    emit_success(opts.output, "snapshot", &outcome, Some(&human))?;

    Ok(())
}
