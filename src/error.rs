//! Failure taxonomy and exit codes for tabq.
//!
//! Every fallible path funnels into one enum so the binary can map a
//! failure to a process exit code and the JSON layer can classify it.
//! Code 2 covers mistakes the user can fix (arguments, config); code 4
//! covers operations that failed underway (store I/O, lock timeouts, a
//! browser that is not listening).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Bad argument: {0}")]
    InvalidArgument(String),

    #[error("Browser request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Browser endpoint error: {0}")]
    Browser(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bad TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML encode error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Timed out waiting for lock {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Process exit code: 2 for user mistakes, 4 for failed operations.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) | Error::InvalidArgument(_) => 2,
            _ => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
