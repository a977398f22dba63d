// ABOUTME: Tunnel descriptor returned by the tunnel-creation endpoint.
// ABOUTME: Parses the JSON body and rejects failed or incomplete responses.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// One reverse forward: the remote server's port back to a local port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub remote_port: u16,
    pub local_port: u16,
}

impl PortMapping {
    /// Format as the `-R` argument value.
    pub fn forward_spec(&self, local_host: &str) -> String {
        format!("{}:{}:{}", self.remote_port, local_host, self.local_port)
    }
}

/// Everything needed to open the tunnel.
#[derive(Debug, Clone)]
pub struct TunnelDescriptor {
    pub ssh_user: String,
    pub ssh_host: String,
    pub port_mappings: Vec<PortMapping>,
    pub private_key: Vec<u8>,
    pub public_urls: Vec<String>,
}

impl TunnelDescriptor {
    /// Parse a response body.
    ///
    /// A body that is not JSON, or whose `ret` is falsy, becomes a protocol error
    /// carrying the server's `message` when there is one.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            tracing::debug!("Tunnel response is not JSON: {}", e);
            Error::rejected(None)
        })?;

        let message = value.get("message").and_then(Value::as_str);
        if !value.get("ret").is_some_and(is_truthy) {
            return Err(Error::rejected(message));
        }

        let raw = RawDescriptor::deserialize(&value).map_err(|e| {
            tracing::debug!("Tunnel response is not a descriptor: {}", e);
            Error::rejected(message)
        })?;

        let (Some(key), Some(host), Some(user)) = (raw.key, raw.host, raw.user) else {
            tracing::debug!("Tunnel response is missing key, host or user");
            return Err(Error::rejected(message));
        };

        Ok(Self {
            ssh_user: user,
            ssh_host: host,
            port_mappings: raw
                .ports
                .into_iter()
                .map(|(local_port, remote_port)| PortMapping {
                    remote_port,
                    local_port,
                })
                .collect(),
            private_key: key.into_bytes(),
            public_urls: raw.urls,
        })
    }

    /// SSH destination in `user@host` form.
    pub fn target(&self) -> String {
        format!("{}@{}", self.ssh_user, self.ssh_host)
    }
}

/// Loose truthiness for `ret`: `false`, `null`, zero, `""`, `"0"` and empty
/// collections are all failures.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

// Each `ports` entry is `[local, remote]`.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    ports: Vec<(u16, u16)>,
    #[serde(default)]
    urls: Vec<String>,
}
