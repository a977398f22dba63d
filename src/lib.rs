// ABOUTME: Library root for qatunnel - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod api;
pub mod config;
pub mod error;
pub mod keyfile;
pub mod output;
pub mod ssh;
pub mod workspace;
