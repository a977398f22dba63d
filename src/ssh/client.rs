// ABOUTME: Handle for a local SSH client executable.
// ABOUTME: A candidate is usable when `<client> -V` exits successfully.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// A validated SSH client: a bare command name resolved via PATH, or a full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshClient {
    program: PathBuf,
}

impl SshClient {
    /// Run `candidate -V` and keep it if it exits successfully.
    pub async fn probe(candidate: impl Into<PathBuf>) -> Option<Self> {
        let program = candidate.into();
        if version_check(&program).await {
            Some(Self { program })
        } else {
            None
        }
    }

    /// Wrap a program without running the version check. Only for building
    /// commands in tests; real clients come from [`SshClient::probe`].
    #[doc(hidden)]
    pub fn unchecked(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Start building a command that runs this client.
    pub fn command(&self) -> Command {
        Command::new(&self.program)
    }
}

impl fmt::Display for SshClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())
    }
}

async fn version_check(program: impl AsRef<OsStr>) -> bool {
    let status = Command::new(program.as_ref())
        .arg("-V")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!("{:?} -V failed to start: {}", program.as_ref(), e);
            false
        }
    }
}
