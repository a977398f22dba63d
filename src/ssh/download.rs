// ABOUTME: Downloads and unpacks a prebuilt OpenSSH client into the workspace.
// ABOUTME: An already unpacked client is reused, so the download happens at most once.

use super::client::SshClient;
use super::error::{Error, Result};
use super::locator::AcquisitionStrategy;
use crate::output::Output;
use crate::workspace::Workspace;
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const WIN32_OPENSSH_URL: &str =
    "http://github.com/PowerShell/Win32-OpenSSH/releases/download/5_30_2016/OpenSSH-Win32.zip";

/// A client shipped as a zip archive.
pub struct BundledDownload {
    url: String,
    archive_name: String,
    /// Location of the executable inside the workspace once unpacked.
    client_path: PathBuf,
}

impl BundledDownload {
    pub fn new(
        url: impl Into<String>,
        archive_name: impl Into<String>,
        client_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            archive_name: archive_name.into(),
            client_path: client_path.into(),
        }
    }

    pub fn win32_openssh() -> Self {
        Self::new(
            WIN32_OPENSSH_URL,
            "OpenSSH-Win32.zip",
            Path::new("OpenSSH-Win32").join("ssh.exe"),
        )
    }

    async fn download(&self, archive: &Path) -> Result<()> {
        let response = reqwest::get(&self.url).await?;
        if !response.status().is_success() {
            return Err(Error::DownloadStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(archive, &bytes).await?;
        tracing::debug!("Saved {} bytes to {}", bytes.len(), archive.display());
        Ok(())
    }
}

#[async_trait]
impl AcquisitionStrategy for BundledDownload {
    fn describe(&self) -> String {
        format!("bundled client from {}", self.url)
    }

    async fn locate(
        &self,
        workspace: &Workspace,
        output: &Output,
    ) -> Result<Option<SshClient>> {
        let client_path = workspace.join(&self.client_path);

        if client_path.is_file()
            && let Some(client) = SshClient::probe(&client_path).await
        {
            tracing::debug!("Reusing unpacked client at {}", client_path.display());
            return Ok(Some(client));
        }

        output.progress("Downloading OpenSSH client...");
        let archive = workspace.join(&self.archive_name);
        self.download(&archive).await?;
        output.success("OpenSSH client was successfully downloaded.");

        let destination = workspace.path().to_path_buf();
        let archive_path = archive.clone();
        tokio::task::spawn_blocking(move || unpack(&archive_path, &destination))
            .await
            .map_err(|e| Error::Extract {
                path: archive.clone(),
                reason: e.to_string(),
            })??;

        match SshClient::probe(&client_path).await {
            Some(client) => Ok(Some(client)),
            None => Err(Error::Unusable(client_path)),
        }
    }
}

/// Extract every entry of a zip archive into `destination`.
pub fn unpack(archive: &Path, destination: &Path) -> Result<()> {
    let extract_error = |reason: String| Error::Extract {
        path: archive.to_path_buf(),
        reason,
    };

    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| extract_error(e.to_string()))?;
    zip.extract(destination)
        .map_err(|e| extract_error(e.to_string()))?;

    tracing::debug!(
        "Unpacked {} entries from {} into {}",
        zip.len(),
        archive.display(),
        destination.display()
    );
    Ok(())
}
