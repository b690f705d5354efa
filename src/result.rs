use std::{io, path::PathBuf};

use thiserror::Error;

use crate::parse::Operator;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandResult {
    Exit,
    Normal,
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("invalid input: {0}")]
    InvalidInput(Operator),
    #[error("syntax error: missing file name after `{0}`")]
    MissingRedirectTarget(Operator),
    #[error("too many pipeline segments (limit {0})")]
    TooManySegments(usize),
    #[error("line too long (limit {0} bytes)")]
    LineTooLong(usize),
    #[error("{}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("{0}: command not found")]
    CommandNotFound(String),
    #[error("{name}: {source}")]
    Exec { name: String, source: io::Error },
    #[error("pipe: {0}")]
    Pipe(io::Error),
    #[error("failed to fork child process: {0}")]
    Fork(io::Error),
}

impl ShellError {
    /// Pipe and process creation failures mean the host can't take more work.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Pipe(_) | ShellError::Fork(_))
    }
}
