// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet, and JSON output modes.

use serde::Serialize;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Only URLs, errors, and the closing notice
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message (suppressed in quiet mode).
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit_stdout(&JsonEvent::new("success", message)),
        }
    }

    /// List the public URLs that the tunnel makes reachable.
    pub fn urls(&self, urls: &[String]) {
        match self.mode {
            OutputMode::Normal => {
                println!("Now following domains are available from QAdept:");
                for url in urls {
                    println!(" - {url}");
                }
                println!();
                println!("Tunnel will be closed once you terminate this process.");
            }
            OutputMode::Quiet => {
                for url in urls {
                    println!("{url}");
                }
            }
            OutputMode::Json => {
                let mut event = JsonEvent::new("tunnel_open", "tunnel is open");
                event.urls = Some(urls);
                emit_stdout(&event);
            }
        }
    }

    /// Show the output of an SSH client that exited unsuccessfully.
    pub fn diagnostics(&self, code: Option<i32>, stdout: &str, stderr: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                println!("{stdout}");
                println!("{stderr}");
            }
            OutputMode::Json => {
                let message = match code {
                    Some(code) => format!("SSH client exited with code {code}"),
                    None => "SSH client was terminated by a signal".to_string(),
                };
                let mut event = JsonEvent::new("ssh_failed", &message);
                event.stdout = Some(stdout);
                event.stderr = Some(stderr);
                emit_stdout(&event);
            }
        }
    }

    /// Print the closing notice.
    pub fn closed(&self) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("Tunnel was closed."),
            OutputMode::Json => {
                emit_stdout(&JsonEvent::new("tunnel_closed", "Tunnel was closed."))
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonEvent::new("error", message)) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn emit_stdout(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    urls: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdout: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stderr: Option<&'a str>,
}

impl<'a> JsonEvent<'a> {
    fn new(event: &'a str, message: &'a str) -> Self {
        Self {
            event,
            message,
            urls: None,
            stdout: None,
            stderr: None,
        }
    }
}
