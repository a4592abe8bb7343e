//! Error types for the shell.
//!
//! Every variant renders as the single line the user sees on the (possibly
//! redirected) error stream.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that can happen while dispatching one input line.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Stream acquisition or working-directory query failed.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// `cd` could not switch to the requested directory.
    #[error("cd: {0}: No such file or directory")]
    PathNotFound(String),

    /// The dispatcher found neither a builtin nor an executable.
    #[error("{0}: command not found")]
    CommandNotFound(String),

    /// `type` could not classify the name.
    #[error("{0}: not found")]
    NotFound(String),

    /// The external program was found but could not be started.
    #[error("Execution error: {0}")]
    LaunchFailure(#[source] io::Error),

    /// The redirection target could not be opened for writing.
    #[error("tinysh: {}: {source}", path.display())]
    RedirectionOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    /// Returns the error kind as a string for logs and tests.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "IOError",
            Self::PathNotFound(_) => "PathNotFound",
            Self::CommandNotFound(_) | Self::NotFound(_) => "CommandNotFound",
            Self::LaunchFailure(_) => "LaunchFailure",
            Self::RedirectionOpen { .. } => "RedirectionOpenFailure",
        }
    }
}

/// Result type alias using ShellError.
pub type Result<T> = std::result::Result<T, ShellError>;
