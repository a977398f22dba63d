// ABOUTME: Application-wide error types for qatunnel.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when the tunnel service cannot be reached or gives no reason.
pub const CONNECT_FAILED: &str = "Can't connect to QAdept.com.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Access token is required.")]
    MissingToken,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Temporary directory \"{path}\" is not writable: {reason}")]
    WorkspaceNotWritable { path: PathBuf, reason: String },

    #[error("no writable key file name in {dir} after {attempts} attempts")]
    KeyPathsExhausted { dir: PathBuf, attempts: usize },

    #[error("{msg} ({0})", msg = CONNECT_FAILED)]
    Network(#[from] reqwest::Error),

    /// Rejected or malformed response; the message is shown verbatim.
    #[error("{0}")]
    Protocol(String),

    #[error("SSH client was not found: {0}")]
    ClientNotFound(String),

    #[error("failed to run SSH client: {0}")]
    Launch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Protocol error carrying the server's message, or the generic fallback.
    pub fn rejected(message: Option<&str>) -> Self {
        match message {
            Some(m) if !m.is_empty() => Error::Protocol(m.to_string()),
            _ => Error::Protocol(CONNECT_FAILED.to_string()),
        }
    }

    /// Process exit code after the error has been reported.
    ///
    /// Bad input and an unusable workspace exit 1. A tunnel that could not be set
    /// up (service unreachable or refusing, no SSH client) only ends the run early.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Network(_) | Error::Protocol(_) | Error::ClientNotFound(_) => 0,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
