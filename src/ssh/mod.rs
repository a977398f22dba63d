// ABOUTME: Local SSH client handling: discovery, bundled download, and tunnel launch.
// ABOUTME: The SSH protocol itself is left entirely to the external client.

mod client;
mod download;
mod error;
mod launcher;
mod locator;

pub use client::SshClient;
pub use download::{BundledDownload, WIN32_OPENSSH_URL, unpack};
pub use error::{Error, Result};
pub use launcher::{TunnelCommand, TunnelOutcome};
pub use locator::{AcquisitionStrategy, KnownPaths, PathLookup, SshLocator};
