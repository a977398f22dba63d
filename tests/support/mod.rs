// ABOUTME: Test support utilities.
// ABOUTME: Provides a canned HTTP server and fake SSH client scripts for integration tests.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use std::thread;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("qatunnel=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// HTTP server that answers every request with the same response.
#[allow(dead_code)]
pub struct CannedServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl CannedServer {
    pub fn json(body: &str) -> Self {
        Self::start("200 OK", "application/json", body.as_bytes().to_vec())
    }

    pub fn start(status: &str, content_type: &str, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let request = read_request_head(&mut stream);
                if let Some(line) = request.lines().next() {
                    seen.lock().unwrap().push(line.to_string());
                }
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Request lines received so far, e.g. `GET /create?token=... HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request_head(stream: &mut impl Read) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// A URL nothing is listening on.
#[allow(dead_code)]
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/create")
}

/// Shell script body for a fake SSH client.
///
/// `-V` always succeeds; any other invocation runs `body`.
#[allow(dead_code)]
pub fn fake_ssh_script(body: &str) -> String {
    format!(
        "#!/bin/sh\nif [ \"$1\" = \"-V\" ]; then\n  echo 'OpenSSH_fake' >&2\n  exit 0\nfi\n{body}\n"
    )
}

/// Write an executable fake SSH client at `dir/name`.
#[cfg(unix)]
#[allow(dead_code)]
pub fn install_fake_ssh(dir: &Path, name: &str, body: &str) -> PathBuf {
    write_executable(&dir.join(name), &fake_ssh_script(body))
}

#[cfg(unix)]
#[allow(dead_code)]
pub fn write_executable(path: &Path, contents: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, contents).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}

/// Fake client body that records one argument per line into `$FAKE_SSH_ARGS`.
#[allow(dead_code)]
pub const RECORD_ARGS: &str = "for arg in \"$@\"; do echo \"$arg\"; done > \"$FAKE_SSH_ARGS\"";
