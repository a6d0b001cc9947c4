//! tabq list command implementation

use chrono::{TimeZone, Utc};

use crate::controller;
use crate::error::Result;
use crate::output::{emit_success, OutputOptions};
use crate::store::TaskStore;
use crate::task::{Task, TaskStatus};

pub struct Options {
    pub store: TaskStore,
    pub status: Option<String>,
    pub verbose: bool,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct ListReport {
    total: usize,
    open: usize,
    completed: usize,
    tasks: Vec<Task>,
}

pub fn run(opts: Options) -> Result<()> {
    let filter: Option<TaskStatus> = opts.status.as_deref().map(str::parse).transpose()?;

    let all = controller::list(&opts.store)?;
    let total = all.len();
    let completed = all.iter().filter(|task| task.is_completed()).count();
    let tasks: Vec<Task> = match filter {
        Some(status) => all.into_iter().filter(|t| t.status == status).collect(),
        None => all,
    };

    let report = ListReport {
        total,
        open: total - completed,
        completed,
        tasks,
    };

    if opts.output.json {
        return emit_success(opts.output, "list", &report, None);
    }
    if opts.output.quiet {
        return Ok(());
    }

    if report.total == 0 {
        println!("No tasks. Run 'tabq snapshot' to capture the open tabs.");
        return Ok(());
    }

    match filter {
        Some(status) if report.tasks.is_empty() => {
            println!("No {status} tasks ({} total)", report.total);
            return Ok(());
        }
        Some(status) => println!(
            "{} {status} task(s) of {} total",
            report.tasks.len(),
            report.total
        ),
        None => println!(
            "{} task(s): {} open, {} completed",
            report.total, report.open, report.completed
        ),
    }

    for task in &report.tasks {
        let marker = if task.is_completed() { "[x]" } else { "[ ]" };
        println!("{marker} {}  {}", task.id, task.display_title());
        if opts.verbose {
            println!("      url: {}", task.url);
            if let Some(tab_id) = &task.tab_id {
                println!("      tab: {tab_id}");
            }
            println!("      captured: {}", format_timestamp(task.created_at));
        }
    }

    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(when) => when.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "-".to_string(),
    }
}
