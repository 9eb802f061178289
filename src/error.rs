//! Error taxonomy for classification runs.
//!
//! Per-file failures (`MoveFailed`) are collected by the classifier and never
//! abort a pass. Everything else aborts the pass it occurred in.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A rule line could not be split into the expected fields.
    #[error("malformed config line {line} ({text:?}): {reason}")]
    ConfigMalformed {
        line: usize,
        text: String,
        reason: String,
    },

    #[error("cannot move {}: {cause}", file.display())]
    MoveFailed {
        file: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// An optional feature was compiled out.
    #[error("{capability} is not available: {hint}")]
    MissingCapability {
        capability: &'static str,
        hint: &'static str,
    },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code for an error that aborted a run.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidArguments(_) => 2,
            _ => 1,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
