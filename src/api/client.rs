// ABOUTME: HTTP client for the tunnel-creation endpoint.
// ABOUTME: Sends a single GET with the token and project list; no retries.

use super::descriptor::TunnelDescriptor;
use crate::config::TunnelRequest;
use crate::error::Result;
use std::time::Duration;

pub struct TunnelClient {
    http: reqwest::Client,
    api_url: String,
}

impl TunnelClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    /// Ask the service to open a tunnel for the request's projects.
    pub async fn create_tunnel(&self, request: &TunnelRequest) -> Result<TunnelDescriptor> {
        let url = request_url(&self.api_url, request);
        tracing::debug!(
            "Requesting tunnel: {}",
            build_url(&self.api_url, "***", request.project_names())
        );

        // Error statuses may still carry a descriptor with a message, so the body is
        // parsed regardless of status.
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Tunnel service answered {} ({} bytes)", status, body.len());

        TunnelDescriptor::from_json(&body)
    }
}

/// Build the request URL. Project names are joined with unescaped commas.
pub fn request_url(api_url: &str, request: &TunnelRequest) -> String {
    build_url(
        api_url,
        &urlencoding::encode(request.token()),
        request.project_names(),
    )
}

fn build_url(api_url: &str, token: &str, project_names: &[String]) -> String {
    let projects = project_names
        .iter()
        .map(|name| urlencoding::encode(name).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    let separator = if api_url.contains('?') { '&' } else { '?' };

    format!("{api_url}{separator}token={token}&projects={projects}")
}
