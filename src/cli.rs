// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Resolves arguments and environment into a tunnel request and settings.

use clap::Parser;
use qatunnel::config::{
    DEFAULT_API_URL, DEFAULT_LOCAL_HOST, DEFAULT_TIMEOUT_SECS, Settings, TunnelRequest,
};
use qatunnel::error::{Error, Result};
use qatunnel::output::OutputMode;
use qatunnel::workspace::Workspace;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qatunnel")]
#[command(about = "Creates a tunnel to QAdept.com")]
#[command(
    long_about = "Creates a tunnel to QAdept.com\n\n\
                  This command allows you to create a tunnel to run automated tests on your local websites."
)]
#[command(version)]
pub struct Cli {
    /// Access token
    pub token: Option<String>,

    /// Names of projects for which you need to create a tunnel (separate with a space).
    /// By default the command creates a tunnel for all your projects.
    pub projects: Vec<String>,

    /// Web server host
    #[arg(long, default_value = DEFAULT_LOCAL_HOST)]
    pub host: String,

    /// Tunnel service endpoint
    #[arg(long, env = "QATUNNEL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Scratch directory for keys and downloaded clients [default: <temp>/Qadept/tunnel]
    #[arg(long, env = "QATUNNEL_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// SSH client to use instead of searching for one
    #[arg(long, env = "QATUNNEL_SSH")]
    pub ssh: Option<PathBuf>,

    /// Seconds to wait for the tunnel service
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Only print URLs, errors, and the closing notice
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }

    pub fn request(&self) -> Result<TunnelRequest> {
        let token = self.token.clone().ok_or(Error::MissingToken)?;
        TunnelRequest::new(token, self.projects.clone(), self.host.clone())
    }

    pub fn settings(&self) -> Result<Settings> {
        let workspace = self
            .workspace
            .clone()
            .unwrap_or_else(Workspace::default_root);

        Settings::new(self.api_url.clone(), workspace)
            .ssh_override(self.ssh.clone())
            .request_timeout(self.timeout)
    }
}
