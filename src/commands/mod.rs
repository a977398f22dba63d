// ABOUTME: Command module aggregator for the qatunnel CLI.
// ABOUTME: Re-exports the create command handler.

mod create;

pub use create::create;
