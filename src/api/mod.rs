// ABOUTME: Client for the QAdept tunnel service.
// ABOUTME: Requests a tunnel and parses the returned descriptor.

mod client;
mod descriptor;

pub use client::{TunnelClient, request_url};
pub use descriptor::{PortMapping, TunnelDescriptor};
