//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `gitmake` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `gitmake` library.
//!
//! Helpers shared by `new` and `render` live in this module.

pub mod completions;
pub mod new;
pub mod render;
pub mod validate;

use anyhow::Result;

use gitmake::output::{emoji, resolved_line, OutputConfig};
use gitmake::prompt::{NonInteractivePrompter, Prompter, TerminalPrompter};
use gitmake::replacement::ReplacementSet;
use gitmake::template::{self, ResolvedTemplate};
use gitmake::tree::TreeReport;

/// Parse every `--set NAME=VALUE` argument.
pub(crate) fn parse_assignments(raw: &[String]) -> Result<Vec<(String, String)>> {
    Ok(raw
        .iter()
        .map(|assignment| template::parse_assignment(assignment))
        .collect::<gitmake::error::Result<Vec<_>>>()?)
}

pub(crate) fn prompter(non_interactive: bool) -> Box<dyn Prompter> {
    if non_interactive {
        Box::new(NonInteractivePrompter)
    } else {
        Box::new(TerminalPrompter::new())
    }
}

/// Print one line per placeholder with its raw and expanded value.
pub(crate) fn print_resolved(out: &OutputConfig, resolved: &ResolvedTemplate, set: &ReplacementSet) {
    println!(
        "{} Resolved template {}",
        emoji(out, "✅", "[OK]"),
        resolved.name
    );
    let patterns: Vec<&str> = resolved
        .placeholders
        .iter()
        .map(|p| p.pattern.as_str())
        .collect();
    for placeholder in &resolved.placeholders {
        let expanded = set.value_of(&placeholder.name).unwrap_or_default();
        println!("{}", resolved_line(out, placeholder, &patterns, &expanded));
    }
}

/// Print what the tree processor did.
pub(crate) fn print_report(out: &OutputConfig, report: &TreeReport) {
    for (from, to) in &report.moved {
        println!(
            "{} Moved {} -> {}",
            emoji(out, "📦", "[MOVE]"),
            from.display(),
            to.display()
        );
    }
    for path in &report.rewritten {
        println!("{} Rewrote {}", emoji(out, "✏️", "[EDIT]"), path.display());
    }
    for skipped in &report.skipped {
        println!(
            "{} Skipped {}: {}",
            emoji(out, "⚠️", "[SKIP]"),
            skipped.path.display(),
            skipped.reason
        );
    }
    println!(
        "{} Processed {} file(s), {} changed, {} skipped",
        emoji(out, "📊", "[INFO]"),
        report.processed.len(),
        report.changed(),
        report.skipped.len()
    );
}
