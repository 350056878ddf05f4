//! # Error Handling
//!
//! This module defines the centralized error type for `gitmake`. It uses the
//! `thiserror` library to describe every failure the library can report,
//! with enough context in each variant to produce an actionable message.
//!
//! The variants fall into four groups:
//!
//! - **Configuration errors** (`ConfigParse`, `SelfReference`,
//!   `OverlappingPatterns`, `CycleDetected`, `UnknownPlaceholder`): the
//!   template descriptor or the supplied values are unusable. These abort the
//!   run and are never retried.
//! - **Resolution errors** (`ResolutionExhausted`, `Prompt`): the user could
//!   not produce an acyclic set of values, or the prompting collaborator
//!   failed.
//! - **Subprocess errors** (`GitCommand`): a `git` invocation failed. The
//!   session layer offers retry, skip or abort for these.
//! - **I/O and parsing errors** (`Filesystem`, `Path`, `Io`, `Json`, `Yaml`).

use thiserror::Error;

/// Main error type for gitmake operations
#[derive(Error, Debug)]
pub enum Error {
    /// The template descriptor could not be read or is invalid.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the descriptor
        hint: Option<String>,
    },

    /// A placeholder's value contains its own pattern.
    #[error("Placeholder {name}'s resolution '{value}' may not contain own pattern '{pattern}'")]
    SelfReference {
        name: String,
        pattern: String,
        value: String,
    },

    /// One placeholder pattern occurs inside another.
    #[error("Placeholder pattern '{inner}' occurs inside pattern '{outer}'")]
    OverlappingPatterns { outer: String, inner: String },

    /// Placeholder values reference each other in a loop.
    #[error("Cycle detected in placeholder resolution: {cycle}")]
    CycleDetected { cycle: String },

    /// The resolution loop gave up after repeated cyclic passes.
    #[error("Placeholder resolution still cyclic after {attempts} attempt(s): {cycle}")]
    ResolutionExhausted { attempts: usize, cycle: String },

    /// A value was supplied for a placeholder the template does not declare.
    #[error("Unknown placeholder '{name}'{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    UnknownPlaceholder { name: String, hint: Option<String> },

    /// A `git` invocation failed.
    #[error("Git command failed in {dir}: {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// The prompting collaborator could not produce an answer.
    #[error("Prompt error: {message}")]
    Prompt { message: String },

    /// An error occurred while reading or rewriting the template tree.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A path could not be represented or would leave the repository root.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether the error describes a broken template rather than a runtime
    /// failure. Configuration errors are never retried.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::ConfigParse { .. }
                | Error::SelfReference { .. }
                | Error::OverlappingPatterns { .. }
                | Error::CycleDetected { .. }
                | Error::UnknownPlaceholder { .. }
                | Error::Json(_)
                | Error::Yaml(_)
        )
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt {
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
