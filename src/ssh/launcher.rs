// ABOUTME: Builds and runs the reverse-tunnel SSH command.
// ABOUTME: Blocks until the tunnel ends; a failing client is reported, not treated as fatal.

use super::client::SshClient;
use super::error::{Error, Result};
use crate::api::TunnelDescriptor;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::process::{Output, Stdio};
use std::time::Duration;

/// How long a failed client exit waits for a matching Ctrl-C.
const INTERRUPT_GRACE: Duration = Duration::from_millis(500);

/// The full SSH invocation for one tunnel.
#[derive(Debug, Clone)]
pub struct TunnelCommand {
    client: SshClient,
    args: Vec<OsString>,
}

impl TunnelCommand {
    /// `-N`, one `-R remote:host:local` per mapping in order, `-i key`, then `user@host`.
    pub fn new(
        client: SshClient,
        descriptor: &TunnelDescriptor,
        key_path: &Path,
        local_host: &str,
    ) -> Self {
        let mut args: Vec<OsString> = vec!["-N".into()];
        for mapping in &descriptor.port_mappings {
            args.push("-R".into());
            args.push(mapping.forward_spec(local_host).into());
        }
        args.push("-i".into());
        args.push(PathBuf::from(key_path).into_os_string());
        args.push(descriptor.target().into());

        Self { client, args }
    }

    pub fn client(&self) -> &SshClient {
        &self.client
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Run the client until it exits or the user interrupts.
    pub async fn run(&self) -> Result<TunnelOutcome> {
        tracing::debug!("Running {} {:?}", self.client, self.args);

        let child = self
            .client
            .command()
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Spawn {
                program: self.client.to_string(),
                source: e,
            })?;

        let mut wait = pin!(child.wait_with_output());
        let mut interrupt = pin!(tokio::signal::ctrl_c());
        let mut listening = true;

        let output = loop {
            tokio::select! {
                biased;
                signal = &mut interrupt, if listening => match signal {
                    Ok(()) => {
                        // Dropping the wait future kills the child.
                        tracing::debug!("Interrupted, stopping SSH client");
                        return Ok(TunnelOutcome::Interrupted);
                    }
                    Err(e) => {
                        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                        listening = false;
                    }
                },
                output = &mut wait => break output?,
            }
        };

        let outcome = TunnelOutcome::from_output(output);

        // A terminal Ctrl-C reaches the client too, which may exit before we see it.
        if listening
            && outcome != TunnelOutcome::Closed
            && let Ok(Ok(())) = tokio::time::timeout(INTERRUPT_GRACE, interrupt).await
        {
            tracing::debug!("SSH client ended by the interrupt");
            return Ok(TunnelOutcome::Interrupted);
        }

        Ok(outcome)
    }
}

/// How the tunnel ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelOutcome {
    Closed,
    Interrupted,
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl TunnelOutcome {
    fn from_output(output: Output) -> Self {
        if output.status.success() {
            TunnelOutcome::Closed
        } else {
            TunnelOutcome::Failed {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        }
    }
}
