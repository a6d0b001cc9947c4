//! Human and JSON emission for tabq results.
//!
//! Commands report in one of two shapes. Human mode prints a header line
//! plus indented facts. JSON mode wraps the command's data in a versioned
//! envelope so scripts can rely on one outer schema across commands.
//! Errors follow the same split: an `error:`/`hint:` pair on stderr, or an
//! error envelope on stdout.

use serde::Serialize;

use crate::error::{Error, Result};

/// Schema tag on every JSON envelope.
pub const SCHEMA_VERSION: &str = "tabq.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human result block: a header, key/value facts, follow-up commands.
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    facts: Vec<(String, String)>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    pub fn push_fact(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts.push((key.into(), value.into()));
    }

    pub fn push_next_step(&mut self, step: impl Into<String>) {
        self.next_steps.push(step.into());
    }

    fn render(&self) -> String {
        let mut lines = vec![self.header.clone()];
        for (key, value) in &self.facts {
            lines.push(format!("  {key}: {value}"));
        }
        if !self.next_steps.is_empty() {
            lines.push(String::new());
            for step in &self.next_steps {
                lines.push(format!("Next: {step}"));
            }
        }
        lines.join("\n")
    }
}

#[derive(Serialize)]
struct SuccessEnvelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    data: &'a T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<String>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    error: ErrorDetail<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<String>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    message: &'a str,
    code: i32,
    kind: &'static str,
}

/// Print a command result in the selected mode.
pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let envelope = SuccessEnvelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !options.quiet {
        if let Some(human) = human {
            println!("{}", human.render());
        }
    }
    Ok(())
}

/// Print a failed command in the selected mode.
///
/// JSON errors go to stdout like any other envelope; human errors go to
/// stderr so piped output stays parseable.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        let message = err.to_string();
        let envelope = ErrorEnvelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorDetail {
                message: &message,
                code: err.exit_code(),
                kind: error_kind(err),
            },
            next_steps,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// First non-flag argument, for labeling envelopes before clap runs.
pub fn infer_command_name_from_args() -> String {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if !arg.starts_with('-') {
            return arg;
        }
        // Value-taking global flags carry their value in the next arg.
        if matches!(arg.as_str(), "--browser-url" | "--store") {
            args.next();
        }
    }
    "tabq".to_string()
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::Http(_) | Error::Browser(_) => vec![
            "start the browser with --remote-debugging-port=9222".to_string(),
            "check --browser-url or TABQ_BROWSER_URL".to_string(),
        ],
        Error::InvalidConfig(_) => vec!["fix tabq.toml then retry".to_string()],
        Error::LockFailed(_) => {
            vec!["another tabq process holds the store lock; retry".to_string()]
        }
        _ => Vec::new(),
    }
}
