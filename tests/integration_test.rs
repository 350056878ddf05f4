//! Integration tests for gitmake functionality
//!
//! These tests drive the library the way the CLI does: load a descriptor,
//! resolve it, compile the replacement set and rewrite a tree.
//!
//! ## Running Integration Tests
//!
//! Tests that run the system `git` binary are disabled by default. To run them:
//!
//! ```bash
//! # Run all tests including integration tests
//! cargo test --features integration-tests
//!
//! # Run only this file
//! cargo test --test integration_test --features integration-tests
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::process::Command;

use gitmake::error::{Error, Result};
use gitmake::git::{GitOperations, SystemGit};
use gitmake::prompt::{Answer, ScriptedPrompter};
use gitmake::resolver::{self, ResolveOptions};
use gitmake::session::{CreateOptions, CreationOutcome, RepoCreator, RepoRequest};
use gitmake::template;
use gitmake::tree::{self, TreeProcessor};
use tempfile::TempDir;

const DESCRIPTOR: &str = r#"{
  "name": "service",
  "placeholders": [
    {"name": "NAME", "description": "Service name", "pattern": "__NAME__"},
    {"name": "PACKAGE", "pattern": "__PACKAGE__", "prompt": false,
     "resolution": "com.acme.__NAME__"},
    {"name": "PATH", "pattern": "__PATH__", "prompt": false,
     "resolution": "src/__PACKAGE__"}
  ]
}"#;

fn write_template(root: &Path) {
    fs::create_dir_all(root.join("template")).unwrap();
    fs::write(root.join("template/config.json"), DESCRIPTOR).unwrap();
    fs::create_dir_all(root.join("__PATH__")).unwrap();
    fs::write(
        root.join("__PATH__/Main.java"),
        "package __PACKAGE__;\n// __NAME__ lives in __PATH__\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# __NAME__\n").unwrap();
}

/// Copies instead of cloning and records every call.
#[derive(Default)]
struct RecordingGit {
    calls: RefCell<Vec<String>>,
}

impl GitOperations for RecordingGit {
    fn clone_repo(&self, source: &str, destination: &Path) -> Result<()> {
        self.calls.borrow_mut().push("clone".to_string());
        if destination.exists() {
            fs::remove_dir_all(destination)?;
        }
        tree::copy_tree(Path::new(source), destination)?;
        Ok(())
    }

    fn stage_all(&self, _repo: &Path) -> Result<()> {
        self.calls.borrow_mut().push("add".to_string());
        Ok(())
    }

    fn commit(&self, _repo: &Path, message: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("commit {}", message));
        Ok(())
    }

    fn set_remote(&self, _repo: &Path, url: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("remote {}", url));
        Ok(())
    }

    fn force_push(&self, _repo: &Path, branch: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("push {}", branch));
        Ok(())
    }
}

#[test]
fn test_resolve_compile_and_rewrite_tree() {
    let template_dir = TempDir::new().unwrap();
    write_template(template_dir.path());

    let template = template::load(template_dir.path()).unwrap();
    let mut prompter = ScriptedPrompter::new([Answer::Text("billing".to_string())]);
    let resolved =
        resolver::resolve(&template, &mut prompter, ResolveOptions::unbounded()).unwrap();
    let replacements = resolved.compile().unwrap();

    assert_eq!(
        replacements.value_of("PATH").as_deref(),
        Some("src/com.acme.billing")
    );

    let output = TempDir::new().unwrap();
    tree::copy_tree(template_dir.path(), output.path()).unwrap();
    let report = TreeProcessor::new(&replacements)
        .process(output.path())
        .unwrap();

    assert!(report.reserved_removed);
    assert_eq!(report.moved.len(), 1);
    assert!(!output.path().join("template").exists());
    assert!(!output.path().join("__PATH__").exists());

    let main = fs::read_to_string(output.path().join("src/com.acme.billing/Main.java")).unwrap();
    assert_eq!(
        main,
        "package com.acme.billing;\n// billing lives in src/com.acme.billing\n"
    );
    let readme = fs::read_to_string(output.path().join("README.md")).unwrap();
    assert_eq!(readme, "# billing\n");
}

#[test]
fn test_cyclic_answers_are_asked_again() {
    let template = template::parse_json(
        r#"{
  "name": "pair",
  "placeholders": [
    {"name": "A", "pattern": "<A>"},
    {"name": "B", "pattern": "<B>"}
  ]
}"#,
    )
    .unwrap();

    let mut prompter = ScriptedPrompter::new([
        Answer::Text("x<B>".to_string()),
        Answer::Text("y<A>".to_string()),
        Answer::Text("x<B>".to_string()),
        Answer::Text("y".to_string()),
    ]);
    let resolved =
        resolver::resolve(&template, &mut prompter, ResolveOptions::unbounded()).unwrap();
    let replacements = resolved.compile().unwrap();

    assert_eq!(prompter.remaining(), 0);
    assert_eq!(replacements.value_of("A").as_deref(), Some("xy"));
    assert_eq!(replacements.apply("<A>-<B>"), "xy-y");
}

#[test]
fn test_bounded_resolution_gives_up() {
    let template = template::parse_json(
        r#"{
  "name": "pair",
  "placeholders": [
    {"name": "A", "pattern": "<A>"},
    {"name": "B", "pattern": "<B>"}
  ]
}"#,
    )
    .unwrap();

    let mut prompter = ScriptedPrompter::new([
        Answer::Text("<B>".to_string()),
        Answer::Text("<A>".to_string()),
        Answer::Text("<B>".to_string()),
        Answer::Text("<A>".to_string()),
    ]);
    let result = resolver::resolve(&template, &mut prompter, ResolveOptions::from_limit(2));

    match result {
        Err(Error::ResolutionExhausted { attempts, cycle }) => {
            assert_eq!(attempts, 2);
            assert_eq!(cycle, "A -> B -> A");
        }
        other => panic!("Expected ResolutionExhausted, got {:?}", other),
    }
}

#[test]
fn test_session_creates_repository_with_expanded_request() {
    let template_dir = TempDir::new().unwrap();
    write_template(template_dir.path());
    let work_dir = TempDir::new().unwrap();

    let template = template::load(template_dir.path()).unwrap();
    let mut prompter = ScriptedPrompter::new([Answer::Text("billing".to_string())]);
    let resolved =
        resolver::resolve(&template, &mut prompter, ResolveOptions::unbounded()).unwrap();
    let replacements = resolved.compile().unwrap();

    let git = RecordingGit::default();
    let creator = RepoCreator::new(&git, &replacements).with_options(CreateOptions {
        branch: "main".to_string(),
        message: "Start __NAME__".to_string(),
    });
    let outcome = creator
        .create_with_recovery(
            work_dir.path(),
            template_dir.path(),
            &mut prompter,
            Some(RepoRequest {
                name: "__NAME__-service".to_string(),
                remote_url: "git@example.com:acme/__NAME__.git".to_string(),
            }),
        )
        .unwrap();

    let CreationOutcome::Created(created) = outcome else {
        panic!("Expected the repository to be created");
    };
    assert_eq!(created.request.name, "billing-service");
    assert_eq!(created.repo_dir, work_dir.path().join("billing-service"));
    assert!(created
        .repo_dir
        .join("src/com.acme.billing/Main.java")
        .is_file());
    assert_eq!(
        *git.calls.borrow(),
        vec![
            "clone".to_string(),
            "add".to_string(),
            "commit Start __NAME__".to_string(),
            "remote git@example.com:acme/billing.git".to_string(),
            "push main".to_string(),
        ]
    );
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Creates a template repository and a bare remote, then pushes a generated
/// repository with the system `git`.
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_system_git_round_trip() {
    let root = TempDir::new().unwrap();
    let template_dir = root.path().join("template-repo");
    let remote_dir = root.path().join("remote.git");
    let work_dir = root.path().join("work");
    fs::create_dir_all(&template_dir).unwrap();
    fs::create_dir_all(&remote_dir).unwrap();
    fs::create_dir_all(&work_dir).unwrap();

    write_template(&template_dir);
    git(&template_dir, &["init", "-q", "--initial-branch=master"]);
    git(&template_dir, &["add", "-A"]);
    git(
        &template_dir,
        &[
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "-q",
            "-m",
            "template",
        ],
    );
    git(&remote_dir, &["init", "-q", "--bare"]);

    let template = template::load(&template_dir).unwrap();
    let mut prompter = ScriptedPrompter::new([Answer::Text("billing".to_string())]);
    let resolved =
        resolver::resolve(&template, &mut prompter, ResolveOptions::unbounded()).unwrap();
    let replacements = resolved.compile().unwrap();

    let system_git = SystemGit::with_identity("Test", "test@example.com");
    let creator = RepoCreator::new(&system_git, &replacements);
    let created = creator
        .create(
            &work_dir,
            &template_dir,
            &RepoRequest {
                name: "billing".to_string(),
                remote_url: remote_dir.to_string_lossy().into_owned(),
            },
        )
        .unwrap();

    assert!(!created.repo_dir.join("template").exists());

    let output = Command::new("git")
        .args(["ls-tree", "-r", "--name-only", "master"])
        .current_dir(&remote_dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    let files = String::from_utf8_lossy(&output.stdout);
    assert!(files.contains("src/com.acme.billing/Main.java"));
    assert!(files.contains("README.md"));
    assert!(!files.contains("template/config.json"));
}
