// ABOUTME: Integration tests for the qatunnel CLI.
// ABOUTME: Runs the binary against a canned tunnel service and a fake SSH client.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use support::CannedServer;

const TUNNEL_RESPONSE: &str = r#"{
    "ret": true,
    "key": "KEYDATA",
    "host": "tun.example.com",
    "user": "tunnel",
    "ports": [[2222, 8080]],
    "urls": ["https://a.qadept.com"]
}"#;

fn qatunnel_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qatunnel"));
    cmd.env_remove("QATUNNEL_API_URL")
        .env_remove("QATUNNEL_WORKSPACE")
        .env_remove("QATUNNEL_SSH")
        .env_remove("RUST_LOG");
    for proxy in ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(proxy);
    }
    cmd
}

#[test]
fn help_shows_arguments() {
    qatunnel_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Creates a tunnel to QAdept.com"))
        .stdout(predicate::str::contains("Access token"))
        .stdout(predicate::str::contains("--host"));
}

#[test]
fn missing_token_fails_before_any_request() {
    let server = CannedServer::json(TUNNEL_RESPONSE);
    let workspace = tempfile::tempdir().unwrap();

    qatunnel_cmd()
        .arg("--api-url")
        .arg(server.url("/create"))
        .arg("--workspace")
        .arg(workspace.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Access token is required."))
        .stdout(predicate::str::contains("Usage:"));

    assert!(server.requests().is_empty());
}

#[test]
fn json_mode_missing_token_keeps_stdout_clean() {
    let assert = qatunnel_cmd()
        .arg("--json")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    let event: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
    assert_eq!(event["event"], "error");
    assert_eq!(event["message"], "Access token is required.");
}

#[test]
fn empty_token_is_treated_as_missing() {
    let server = CannedServer::json(TUNNEL_RESPONSE);

    qatunnel_cmd()
        .arg("")
        .arg("--api-url")
        .arg(server.url("/create"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Access token is required."));

    assert!(server.requests().is_empty());
}

#[test]
fn unwritable_workspace_exits_with_code_1() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();
    let server = CannedServer::json(TUNNEL_RESPONSE);

    qatunnel_cmd()
        .arg("abc123")
        .arg("--api-url")
        .arg(server.url("/create"))
        .arg("--workspace")
        .arg(blocker.join("tunnel"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not writable"));

    assert!(server.requests().is_empty());
}

#[test]
fn rejected_request_shows_server_message() {
    let server = CannedServer::json(r#"{"ret": false, "message": "Project \"shop\" not found."}"#);
    let workspace = tempfile::tempdir().unwrap();

    qatunnel_cmd()
        .args(["abc123", "shop"])
        .arg("--api-url")
        .arg(server.url("/create"))
        .arg("--workspace")
        .arg(workspace.path())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Project \"shop\" not found."));

    assert!(!workspace.path().join("tunnel_key").exists());
}

#[test]
fn unreachable_service_reports_connection_failure() {
    let workspace = tempfile::tempdir().unwrap();

    qatunnel_cmd()
        .arg("abc123")
        .arg("--api-url")
        .arg(support::refused_url())
        .arg("--workspace")
        .arg(workspace.path())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Can't connect to QAdept.com."));
}

#[cfg(unix)]
#[test]
fn missing_ssh_client_is_reported() {
    let server = CannedServer::json(TUNNEL_RESPONSE);
    let workspace = tempfile::tempdir().unwrap();
    let empty_path = tempfile::tempdir().unwrap();

    qatunnel_cmd()
        .arg("abc123")
        .arg("--api-url")
        .arg(server.url("/create"))
        .arg("--workspace")
        .arg(workspace.path())
        .env("PATH", empty_path.path())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("SSH client was not found"));
}

#[cfg(unix)]
mod with_fake_ssh {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn path_with(dir: &Path) -> String {
        match std::env::var("PATH") {
            Ok(path) => format!("{}:{}", dir.display(), path),
            Err(_) => dir.display().to_string(),
        }
    }

    #[test]
    fn opens_tunnel_end_to_end() {
        let server = CannedServer::json(TUNNEL_RESPONSE);
        let workspace = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        support::install_fake_ssh(bin.path(), "ssh", support::RECORD_ARGS);
        let args_file = bin.path().join("args");

        qatunnel_cmd()
            .arg("abc123")
            .arg("--api-url")
            .arg(server.url("/system/createTunnel"))
            .arg("--workspace")
            .arg(workspace.path())
            .env("PATH", path_with(bin.path()))
            .env("FAKE_SSH_ARGS", &args_file)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Now following domains are available from QAdept:",
            ))
            .stdout(predicate::str::contains(" - https://a.qadept.com"))
            .stdout(predicate::str::contains("Tunnel was closed."));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(
            requests[0].starts_with("GET /system/createTunnel?token=abc123&projects= "),
            "unexpected request: {}",
            requests[0]
        );

        let key_path = workspace.path().join("tunnel_key");
        assert_eq!(fs::read_to_string(&key_path).unwrap(), "KEYDATA");

        let recorded = fs::read_to_string(&args_file).unwrap();
        let args: Vec<&str> = recorded.lines().collect();
        let key_arg = key_path.display().to_string();
        assert_eq!(
            args,
            vec![
                "-N",
                "-R",
                "8080:127.0.0.1:2222",
                "-i",
                key_arg.as_str(),
                "tunnel@tun.example.com"
            ]
        );
    }

    #[test]
    fn host_override_and_projects_reach_the_tunnel() {
        let server = CannedServer::json(TUNNEL_RESPONSE);
        let workspace = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        support::install_fake_ssh(bin.path(), "ssh", support::RECORD_ARGS);
        let args_file = bin.path().join("args");

        qatunnel_cmd()
            .args(["abc123", "shop", "blog"])
            .arg("--host")
            .arg("192.168.0.10")
            .arg("--api-url")
            .arg(server.url("/create"))
            .arg("--workspace")
            .arg(workspace.path())
            .env("PATH", path_with(bin.path()))
            .env("FAKE_SSH_ARGS", &args_file)
            .assert()
            .success();

        assert!(server.requests()[0].contains("token=abc123&projects=shop,blog "));
        let recorded = fs::read_to_string(&args_file).unwrap();
        assert!(recorded.lines().any(|l| l == "8080:192.168.0.10:2222"));
    }

    #[test]
    fn failing_ssh_prints_diagnostics_and_still_closes() {
        let server = CannedServer::json(TUNNEL_RESPONSE);
        let workspace = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let ssh = support::install_fake_ssh(
            bin.path(),
            "fake-ssh",
            "echo 'connecting'\necho 'Permission denied (publickey).' >&2\nexit 255",
        );

        qatunnel_cmd()
            .arg("abc123")
            .arg("--api-url")
            .arg(server.url("/create"))
            .arg("--workspace")
            .arg(workspace.path())
            .arg("--ssh")
            .arg(&ssh)
            .assert()
            .success()
            .stdout(predicate::str::contains("connecting"))
            .stdout(predicate::str::contains("Permission denied (publickey)."))
            .stdout(predicate::str::contains("Tunnel was closed."));
    }

    #[test]
    fn json_mode_emits_events() {
        let server = CannedServer::json(TUNNEL_RESPONSE);
        let workspace = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let ssh = support::install_fake_ssh(bin.path(), "fake-ssh", "exit 0");

        let assert = qatunnel_cmd()
            .arg("abc123")
            .arg("--json")
            .arg("--api-url")
            .arg(server.url("/create"))
            .arg("--workspace")
            .arg(workspace.path())
            .env("QATUNNEL_SSH", &ssh)
            .assert()
            .success();

        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        let events: Vec<serde_json::Value> = stdout
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "tunnel_open");
        assert_eq!(events[0]["urls"][0], "https://a.qadept.com");
        assert_eq!(events[1]["event"], "tunnel_closed");
    }
}
