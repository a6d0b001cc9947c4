//! tabq - Tab Queue CLI
//!
//! A standalone CLI that captures a browser's open tabs as a persisted task
//! list and drives the browser from it: focus, complete, reopen, reorder.

use clap::Parser;
use tabq::cli::Cli;
use tabq::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Tracing is opt-in via RUST_LOG; a malformed or oversized filter falls
/// back to "off" instead of aborting startup.
fn init_tracing() {
    let filter = match std::env::var("RUST_LOG") {
        Ok(raw) if !raw.trim().is_empty() && raw.trim().len() <= 4096 => {
            EnvFilter::try_new(raw.trim()).unwrap_or_else(|_| EnvFilter::new("off"))
        }
        _ => EnvFilter::new("off"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let command = infer_command_name_from_args();
    let cli = Cli::parse();
    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
