// ABOUTME: Scratch directory for key material and downloaded SSH clients.
// ABOUTME: Resolved once per run and passed explicitly to every component.

use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// A writable scratch directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Default location: `<temp>/Qadept/tunnel`.
    pub fn default_root() -> PathBuf {
        std::env::temp_dir().join("Qadept").join("tunnel")
    }

    /// Create the directory if needed and check that files can be written in it.
    pub fn acquire(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|e| not_writable(&root, e))?;

        let probe = root.join(format!(".write-probe-{}", std::process::id()));
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&probe)
            .map_err(|e| not_writable(&root, e))?;
        let _ = fs::remove_file(&probe);

        tracing::debug!("Using workspace {}", root.display());
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }
}

fn not_writable(path: &Path, err: std::io::Error) -> Error {
    Error::WorkspaceNotWritable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
