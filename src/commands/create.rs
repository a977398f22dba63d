// ABOUTME: Create command implementation.
// ABOUTME: Requests a tunnel, writes its key, finds an SSH client, and runs it until closed.

use qatunnel::api::TunnelClient;
use qatunnel::config::{Settings, TunnelRequest};
use qatunnel::error::{Error, Result};
use qatunnel::keyfile;
use qatunnel::output::Output;
use qatunnel::ssh::{SshLocator, TunnelCommand, TunnelOutcome};
use qatunnel::workspace::Workspace;

/// Open a tunnel and block until it closes.
pub async fn create(request: TunnelRequest, settings: Settings, output: &Output) -> Result<()> {
    let workspace = Workspace::acquire(&settings.workspace)?;

    let client = TunnelClient::new(&settings.api_url, settings.request_timeout)?;
    let descriptor = client.create_tunnel(&request).await?;

    let key = keyfile::write_key(&workspace, &descriptor.private_key)?;

    let ssh = SshLocator::for_platform()
        .with_override(settings.ssh_override.clone())
        .locate(&workspace, output)
        .await
        .map_err(|e| Error::ClientNotFound(e.to_string()))?;

    let command = TunnelCommand::new(ssh, &descriptor, key.path(), request.local_host());

    output.urls(&descriptor.public_urls);

    let outcome = command
        .run()
        .await
        .map_err(|e| Error::Launch(e.to_string()))?;

    match outcome {
        TunnelOutcome::Failed {
            code,
            stdout,
            stderr,
        } => {
            tracing::warn!("SSH client exited unsuccessfully: {:?}", code);
            output.diagnostics(code, &stdout, &stderr);
        }
        TunnelOutcome::Closed | TunnelOutcome::Interrupted => {}
    }

    output.closed();
    Ok(())
}
