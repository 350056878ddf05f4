//! End-to-end tests for the interactive `new` command using TTY simulation.
//!
//! These tests use the `rexpect` crate to simulate an interactive terminal session,
//! which is required because `dialoguer` prompts need a real TTY.
//!
//! **Platform limitation**: `rexpect` only works on Unix-like systems (Linux, macOS, WSL).
//! These tests are automatically skipped on Windows.
//!
//! See: <https://github.com/console-rs/dialoguer/issues/95>

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::Command;

use rexpect::session::{spawn_command, PtySession};
use tempfile::TempDir;

const DESCRIPTOR: &str = r#"{
  "name": "service",
  "placeholders": [
    {"name": "NAME", "description": "Service name", "pattern": "{{NAME}}"},
    {"name": "PACKAGE", "pattern": "{{PACKAGE}}", "prompt": false,
     "resolution": "org.example.{{NAME}}"}
  ]
}"#;

/// Get the path to the `gitmake` binary.
fn get_binary_path() -> std::path::PathBuf {
    // First try the release binary
    let release_path = std::path::Path::new("target/release/gitmake");
    if release_path.exists() {
        return release_path.to_path_buf();
    }

    // Fall back to debug binary
    let debug_path = std::path::Path::new("target/debug/gitmake");
    if debug_path.exists() {
        return debug_path.to_path_buf();
    }

    // Build the binary if neither exists
    let status = Command::new("cargo")
        .args(["build", "--bin", "gitmake"])
        .status()
        .expect("Failed to build binary");
    assert!(status.success(), "Failed to build gitmake binary");

    debug_path.to_path_buf()
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// A template repository, a bare remote and a working directory.
struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let template = root.path().join("template-repo");
        let remote = root.path().join("remote.git");
        fs::create_dir_all(template.join("template")).unwrap();
        fs::create_dir_all(template.join("src/{{NAME}}")).unwrap();
        fs::create_dir_all(&remote).unwrap();

        fs::write(template.join("template/config.json"), DESCRIPTOR).unwrap();
        fs::write(template.join("src/{{NAME}}/lib.txt"), "package {{PACKAGE}}\n").unwrap();

        git(&template, &["init", "-q", "--initial-branch=master"]);
        git(&template, &["add", "-A"]);
        git(&template, &["commit", "-q", "-m", "template"]);
        git(&remote, &["init", "-q", "--bare"]);

        Self { root }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.root.path().join(name)
    }

    fn remote_files(&self) -> String {
        let output = Command::new("git")
            .args(["ls-tree", "-r", "--name-only", "master"])
            .current_dir(self.path("remote.git"))
            .output()
            .expect("Failed to run git ls-tree");
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

/// Create a new PTY session running `gitmake new` against the workspace.
fn spawn_new(workspace: &Workspace, extra: &[&str]) -> Result<PtySession, rexpect::error::Error> {
    let binary = get_binary_path();
    let binary_path = binary
        .canonicalize()
        .expect("Failed to get absolute binary path");

    let mut cmd = Command::new(&binary_path);
    cmd.arg("--color")
        .arg("never")
        .arg("new")
        .arg("--template")
        .arg(workspace.path("template-repo"))
        .arg("--work-dir")
        .arg(workspace.path("work"))
        .args(extra)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .current_dir(workspace.root.path());

    spawn_command(cmd, Some(30_000)) // 30 second timeout
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_interactive_new_pushes_repository() {
    let workspace = Workspace::new();
    let remote = workspace.path("remote.git");
    let remote = remote.to_string_lossy();

    let mut session = spawn_new(&workspace, &["--name", "{{NAME}}-service", "--remote", &remote])
        .expect("Failed to spawn interactive session");

    session
        .exp_string("Successfully loaded template service")
        .expect("Should load the template");
    session
        .exp_string("Placeholder NAME value? (Service name)")
        .expect("Should ask for NAME");
    session.send_line("billing").expect("Failed to send value");

    session
        .exp_string("{{PACKAGE}} = org.example.{{NAME}} = org.example.billing")
        .expect("Should print the resolved values");
    session
        .exp_string("Create another repository from template?")
        .expect("Should offer another repository");
    session.send_line("n").expect("Failed to decline");
    session.exp_eof().expect("Should exit");

    let files = workspace.remote_files();
    assert!(files.contains("src/billing/lib.txt"), "remote has: {}", files);
    assert!(!files.contains("template/config.json"));
    assert!(workspace.path("work/repos/billing-service").is_dir());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_interactive_new_rejects_self_reference() {
    let workspace = Workspace::new();
    let remote = workspace.path("remote.git");
    let remote = remote.to_string_lossy();

    let mut session = spawn_new(&workspace, &["--name", "demo", "--remote", &remote])
        .expect("Failed to spawn interactive session");

    session
        .exp_string("Placeholder NAME value?")
        .expect("Should ask for NAME");
    session.send_line("my-{{NAME}}").expect("Failed to send value");
    session
        .exp_string("may not contain its own pattern")
        .expect("Should reject the self reference");
    // Clear anything left of the rejected answer
    for _ in 0.."my-{{NAME}}".len() {
        session.send("\x7f").expect("Failed to send backspace");
    }
    session.send_line("demo").expect("Failed to send value");

    session
        .exp_string("Create another repository from template?")
        .expect("Should finish the repository");
    session.send_line("n").expect("Failed to decline");
    session.exp_eof().expect("Should exit");

    assert!(workspace.remote_files().contains("src/demo/lib.txt"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_interactive_new_abort_after_failed_push() {
    let workspace = Workspace::new();
    let missing = workspace.path("missing.git");
    let missing = missing.to_string_lossy();

    let mut session = spawn_new(
        &workspace,
        &["--set", "NAME=demo", "--name", "demo", "--remote", &missing],
    )
    .expect("Failed to spawn interactive session");

    session
        .exp_string("Try again?")
        .expect("Should offer recovery");
    // Retry, Other template, Abort
    session.send("\x1b[B").expect("Failed to move down");
    session.send("\x1b[B").expect("Failed to move down");
    session.send_line("").expect("Failed to choose");

    session.exp_string("Aborted").expect("Should abort");
    session.exp_eof().expect("Should exit");
}
