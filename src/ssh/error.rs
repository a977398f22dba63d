// ABOUTME: SSH-client-specific error types.
// ABOUTME: Covers locating, downloading, unpacking, and launching the SSH client.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tried {}", .0.join(", "))]
    NotFound(Vec<String>),

    #[error("Can't download OpenSSH client: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Can't download OpenSSH client: server answered {0}")]
    DownloadStatus(reqwest::StatusCode),

    #[error("Can't open downloaded archive {path}: {reason}")]
    Extract { path: PathBuf, reason: String },

    #[error("unpacked client at {0} does not run")]
    Unusable(PathBuf),

    #[error("failed to start SSH client {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
