// ABOUTME: Writes the tunnel's private key into the workspace.
// ABOUTME: Skips key files this user cannot overwrite and restricts permissions to the owner.

use crate::error::{Error, Result};
use crate::workspace::Workspace;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const KEY_FILENAME: &str = "tunnel_key";

/// Numbered names tried before giving up.
pub const MAX_KEY_CANDIDATES: usize = 1000;

/// A private key written to disk.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `key` to `tunnel_key`, or `tunnel_key_N` when earlier names are held by
/// someone else.
pub fn write_key(workspace: &Workspace, key: &[u8]) -> Result<KeyFile> {
    let path = select_key_path(workspace)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    // Permissions are fixed before any key bytes reach the file.
    let mut file = options.open(&path)?;
    restrict_to_owner(&file)?;
    file.write_all(key)?;
    file.flush()?;

    tracing::info!("Wrote tunnel key to {}", path.display());
    Ok(KeyFile { path })
}

fn select_key_path(workspace: &Workspace) -> Result<PathBuf> {
    let first = workspace.join(KEY_FILENAME);
    if is_usable(&first) {
        return Ok(first);
    }
    tracing::warn!("{} is not writable, trying another name", first.display());

    for i in 1..=MAX_KEY_CANDIDATES {
        let candidate = workspace.join(format!("{KEY_FILENAME}_{i}"));
        if is_usable(&candidate) {
            return Ok(candidate);
        }
        tracing::warn!("{} is not writable, trying another name", candidate.display());
    }

    Err(Error::KeyPathsExhausted {
        dir: workspace.path().to_path_buf(),
        attempts: MAX_KEY_CANDIDATES + 1,
    })
}

fn is_usable(path: &Path) -> bool {
    is_usable_by(path, current_owner())
}

/// A path is usable if nothing is there, or if it's a file `owner` owns and can write.
fn is_usable_by(path: &Path, owner: Option<u32>) -> bool {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return true;
    };

    if !metadata.is_file() || metadata.permissions().readonly() {
        return false;
    }
    if !owned_by(&metadata, owner) {
        return false;
    }

    OpenOptions::new().write(true).open(path).is_ok()
}

#[cfg(unix)]
fn current_owner() -> Option<u32> {
    // SAFETY: geteuid has no preconditions and cannot fail.
    Some(unsafe { libc::geteuid() })
}

#[cfg(not(unix))]
fn current_owner() -> Option<u32> {
    None
}

#[cfg(unix)]
fn owned_by(metadata: &fs::Metadata, owner: Option<u32>) -> bool {
    use std::os::unix::fs::MetadataExt;
    owner.is_none_or(|uid| metadata.uid() == uid)
}

#[cfg(not(unix))]
fn owned_by(_metadata: &fs::Metadata, _owner: Option<u32>) -> bool {
    true
}

#[cfg(unix)]
fn restrict_to_owner(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_to_owner(_file: &fs::File) -> Result<()> {
    Ok(())
}
