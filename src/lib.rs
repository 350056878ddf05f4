//! # gitmake Library
//!
//! This library provides the core of the `gitmake` command-line tool: it
//! resolves the placeholders of a repository template and rewrites file
//! contents and paths with the resolved values. It can be embedded in other
//! tools that generate repositories from templates.
//!
//! ## Quick Example
//!
//! ```
//! use gitmake::placeholder::Placeholder;
//! use gitmake::prompt::NonInteractivePrompter;
//! use gitmake::resolver::{self, ResolveOptions};
//! use gitmake::template::Template;
//!
//! let template = Template {
//!     name: "service".to_string(),
//!     placeholders: vec![
//!         Placeholder::new("NAME", "{{NAME}}").with_default("demo"),
//!         Placeholder::new("PACKAGE", "{{PACKAGE}}")
//!             .with_default("org.example.{{NAME}}")
//!             .with_prompt(false),
//!     ],
//! };
//! template.validate().unwrap();
//!
//! let resolved = resolver::resolve(
//!     &template,
//!     &mut NonInteractivePrompter,
//!     ResolveOptions::default(),
//! )
//! .unwrap();
//! let replacements = resolved.compile().unwrap();
//!
//! assert_eq!(
//!     replacements.apply("package {{PACKAGE}};"),
//!     "package org.example.demo;"
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Placeholders (`placeholder`)**: named, pattern-keyed substitution
//!   points whose defaults may reference other placeholders.
//! - **Dependency graph (`graph`)**: which placeholder values reference which
//!   patterns, with self-reference rejection and cycle detection.
//! - **Resolution (`resolver`)**: an explicit loop that asks for values and
//!   starts over when they form a cycle.
//! - **Replacement nodes (`replacement`)**: a shared, arena-backed node graph
//!   expanding nested references on demand.
//! - **Substitution (`substitute`)**: the pure engine applying many
//!   length-changing replacements to one string in a single pass.
//! - **Tree processing (`tree`)**: rewriting contents and paths of a checked
//!   out template.
//!
//! ## Execution Flow
//!
//! 1.  **Load**: parse and validate the template descriptor (`template`).
//! 2.  **Resolve**: obtain a value for every placeholder (`resolver`).
//! 3.  **Compile**: build the replacement node set (`replacement`).
//! 4.  **Create**: clone the template, rewrite the tree, commit and push
//!     (`session`, `tree`, `git`).
//!
//! User interaction goes through the `prompt::Prompter` trait and `git`
//! through `git::GitOperations`, so every step can run without a terminal or
//! a network.

pub mod defaults;
pub mod error;
pub mod git;
pub mod graph;
pub mod output;
pub mod placeholder;
pub mod prompt;
pub mod replacement;
pub mod resolver;
pub mod session;
pub mod substitute;
pub mod suggestions;
pub mod template;
pub mod tree;

#[cfg(test)]
mod substitute_proptest;
