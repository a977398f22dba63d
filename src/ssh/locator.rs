// ABOUTME: SSH client discovery through an ordered list of acquisition strategies.
// ABOUTME: PATH lookup everywhere; known install paths and a bundled download on Windows.

use super::client::SshClient;
use super::download::BundledDownload;
use super::error::{Error, Result};
use crate::output::Output;
use crate::workspace::Workspace;
use async_trait::async_trait;
use std::path::PathBuf;

/// One way of obtaining a working SSH client.
#[async_trait]
pub trait AcquisitionStrategy: Send + Sync {
    /// Short description used in logs and the not-found error.
    fn describe(&self) -> String;

    /// `Ok(None)` means nothing usable here and the next strategy should be tried.
    /// An error stops the search.
    async fn locate(&self, workspace: &Workspace, output: &Output)
    -> Result<Option<SshClient>>;
}

/// A command resolved through PATH, or an explicit path given by the user.
pub struct PathLookup {
    program: PathBuf,
}

impl PathLookup {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PathLookup {
    fn default() -> Self {
        Self::new("ssh")
    }
}

#[async_trait]
impl AcquisitionStrategy for PathLookup {
    fn describe(&self) -> String {
        format!("`{}`", self.program.display())
    }

    async fn locate(
        &self,
        _workspace: &Workspace,
        _output: &Output,
    ) -> Result<Option<SshClient>> {
        Ok(SshClient::probe(&self.program).await)
    }
}

/// Fixed install locations, checked for existence before probing.
pub struct KnownPaths {
    paths: Vec<PathBuf>,
}

impl KnownPaths {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Git for Windows ships an OpenSSH client.
    pub fn git_for_windows() -> Self {
        Self::new(vec![
            PathBuf::from(r"C:\Program Files\Git\usr\bin\ssh.exe"),
            PathBuf::from(r"C:\Program Files (x86)\Git\usr\bin\ssh.exe"),
        ])
    }
}

#[async_trait]
impl AcquisitionStrategy for KnownPaths {
    fn describe(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn locate(
        &self,
        _workspace: &Workspace,
        _output: &Output,
    ) -> Result<Option<SshClient>> {
        for path in &self.paths {
            if path.is_file()
                && let Some(client) = SshClient::probe(path).await
            {
                return Ok(Some(client));
            }
        }
        Ok(None)
    }
}

/// Tries each strategy in order until one yields a client.
pub struct SshLocator {
    strategies: Vec<Box<dyn AcquisitionStrategy>>,
}

impl SshLocator {
    pub fn new(strategies: Vec<Box<dyn AcquisitionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Strategies for the platform this binary was built for.
    pub fn for_platform() -> Self {
        let mut strategies: Vec<Box<dyn AcquisitionStrategy>> =
            vec![Box::new(PathLookup::default())];
        if cfg!(windows) {
            strategies.push(Box::new(KnownPaths::git_for_windows()));
            strategies.push(Box::new(BundledDownload::win32_openssh()));
        }
        Self::new(strategies)
    }

    /// Try `program` before anything else.
    pub fn with_override(mut self, program: Option<PathBuf>) -> Self {
        if let Some(program) = program {
            self.strategies.insert(0, Box::new(PathLookup::new(program)));
        }
        self
    }

    pub async fn locate(&self, workspace: &Workspace, output: &Output) -> Result<SshClient> {
        let mut tried = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let description = strategy.describe();
            tracing::debug!("Looking for SSH client: {}", description);

            if let Some(client) = strategy.locate(workspace, output).await? {
                tracing::debug!("Using SSH client {}", client);
                return Ok(client);
            }
            tried.push(description);
        }

        Err(Error::NotFound(tried))
    }
}
