//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and descriptor snippets to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_descriptor(descriptors::SIMPLE);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::descriptors;
    pub use super::TestFixture;
}

/// Template descriptors for testing.
#[allow(dead_code)]
pub mod descriptors {
    /// NAME must be supplied; PACKAGE defaults to a value referencing NAME.
    pub const SIMPLE: &str = r#"{
  "name": "simple",
  "placeholders": [
    {"name": "NAME", "description": "Project name", "pattern": "{{NAME}}"},
    {"name": "PACKAGE", "pattern": "{{PACKAGE}}", "prompt": false,
     "resolution": "org.example.{{NAME}}"}
  ]
}"#;

    /// Every placeholder has a default and is never prompted for.
    pub const DEFAULTS_ONLY: &str = r#"{
  "name": "defaults",
  "placeholders": [
    {"name": "NAME", "pattern": "{{NAME}}", "prompt": false, "resolution": "demo"},
    {"name": "GREETING", "pattern": "{{GREETING}}", "prompt": false,
     "resolution": "Hello from {{NAME}}"}
  ]
}"#;

    /// A default that contains its own pattern.
    pub const SELF_REFERENCE: &str = r#"{
  "name": "broken",
  "placeholders": [
    {"name": "NAME", "pattern": "{{NAME}}", "resolution": "my-{{NAME}}"}
  ]
}"#;

    /// Two defaults that reference each other.
    pub const CYCLE: &str = r#"{
  "name": "cyclic",
  "placeholders": [
    {"name": "A", "pattern": "{{A}}", "resolution": "a-{{B}}"},
    {"name": "B", "pattern": "{{B}}", "resolution": "b-{{A}}"}
  ]
}"#;

    /// One pattern contains another.
    pub const OVERLAPPING: &str = r#"{
  "name": "overlap",
  "placeholders": [
    {"name": "NAME", "pattern": "NAME"},
    {"name": "FULL_NAME", "pattern": "FULL_NAME"}
  ]
}"#;

    /// Invalid JSON for error testing.
    pub const INVALID_JSON: &str = r#"{"name": "broken", "placeholders": ["#;
}

/// A temporary template directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_descriptor(descriptors::SIMPLE)
///     .with_file("{{NAME}}/main.txt", "hello {{NAME}}");
///
/// fixture.command().arg("validate").arg(fixture.path()).assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `template/config.json` with the given content.
    pub fn with_descriptor(self, content: &str) -> Self {
        self.temp_dir
            .child("template/config.json")
            .write_str(content)
            .expect("Failed to write descriptor");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a binary file with the given path and content.
    #[allow(dead_code)]
    pub fn with_binary_file(self, path: &str, content: &[u8]) -> Self {
        self.temp_dir
            .child(path)
            .write_binary(content)
            .expect("Failed to write binary file");
        self
    }

    /// Get the path to the template root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the descriptor.
    #[allow(dead_code)]
    pub fn descriptor_path(&self) -> PathBuf {
        self.temp_dir.path().join("template/config.json")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command for the gitmake binary running in this directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("gitmake");
        cmd.current_dir(self.path()).arg("--color").arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_descriptor() {
        let fixture = TestFixture::new().with_descriptor(descriptors::SIMPLE);
        assert!(fixture.descriptor_path().exists());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("{{NAME}}/main.txt", "hello");
        assert!(fixture.path().join("{{NAME}}/main.txt").exists());
    }

    #[test]
    fn test_descriptors_are_valid_json() {
        let descriptors = [
            descriptors::SIMPLE,
            descriptors::DEFAULTS_ONLY,
            descriptors::SELF_REFERENCE,
            descriptors::CYCLE,
            descriptors::OVERLAPPING,
        ];

        for descriptor in descriptors {
            serde_json::from_str::<serde_json::Value>(descriptor)
                .expect("Descriptor should be valid JSON");
        }
    }

    #[test]
    fn test_invalid_json_is_actually_invalid() {
        let result = serde_json::from_str::<serde_json::Value>(descriptors::INVALID_JSON);
        assert!(result.is_err(), "INVALID_JSON should not parse");
    }
}
