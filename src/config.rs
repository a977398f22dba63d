// ABOUTME: Resolved runtime configuration for a tunnel invocation.
// ABOUTME: Holds the tunnel request and the settings that locate the service and workspace.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://qadept.com/system/createTunnel";
pub const DEFAULT_LOCAL_HOST: &str = "127.0.0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to ask the tunnel service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelRequest {
    token: String,
    project_names: Vec<String>,
    local_host: String,
}

impl TunnelRequest {
    /// Build a request. An empty project list means all projects.
    pub fn new(
        token: impl Into<String>,
        project_names: Vec<String>,
        local_host: impl Into<String>,
    ) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::MissingToken);
        }

        let local_host = local_host.into();
        if local_host.trim().is_empty() {
            return Err(Error::InvalidConfig("local host cannot be empty".to_string()));
        }

        Ok(Self {
            token,
            project_names,
            local_host,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn project_names(&self) -> &[String] {
        &self.project_names
    }

    pub fn local_host(&self) -> &str {
        &self.local_host
    }
}

/// Where the service and scratch directory live, and how long to wait on the network.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub workspace: PathBuf,
    pub ssh_override: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn new(api_url: impl Into<String>, workspace: PathBuf) -> Self {
        Self {
            api_url: api_url.into(),
            workspace,
            ssh_override: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn ssh_override(mut self, path: Option<PathBuf>) -> Self {
        self.ssh_override = path;
        self
    }

    pub fn request_timeout(mut self, secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(Error::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        self.request_timeout = Duration::from_secs(secs);
        Ok(self)
    }
}
