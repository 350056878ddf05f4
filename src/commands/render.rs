//! # Render Command Implementation
//!
//! This module implements the `render` subcommand: it resolves the
//! placeholders of a local template directory, copies the template (without
//! `.git`) into an output directory and rewrites the copy there. No git
//! commands are run, which makes `render` the offline counterpart of `new`.
//!
//! ## Example
//!
//! ```bash
//! gitmake render ./service-template ./demo --set NAME=demo --non-interactive
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use gitmake::defaults::DEFAULT_MAX_ATTEMPTS;
use gitmake::output::{emoji, OutputConfig};
use gitmake::resolver::{self, ResolveOptions};
use gitmake::template;
use gitmake::tree::{self, TreeProcessor};

use super::{parse_assignments, print_report, print_resolved, prompter};

/// Render a local template directory into an output directory
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Template directory containing template/config.json
    #[arg(value_name = "TEMPLATE_DIR")]
    pub template: PathBuf,

    /// Directory the rendered files are written to
    #[arg(value_name = "OUTPUT_DIR")]
    pub output: PathBuf,

    /// Set a placeholder value without prompting (repeatable)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Never prompt; placeholders without a value are an error
    #[arg(long)]
    pub non_interactive: bool,

    /// Resolution passes before giving up on cyclic values (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Render into an output directory that is not empty
    #[arg(long)]
    pub force: bool,
}

/// Execute the `render` command.
pub fn execute(args: RenderArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Loading template: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.template.display()
    );

    let overrides = parse_assignments(&args.set)?;
    let template = template::load(&args.template)?.with_overrides(&overrides)?;

    if !args.force && !is_empty_dir(&args.output)? {
        anyhow::bail!(
            "Output directory {} is not empty (use --force to render anyway)",
            args.output.display()
        );
    }

    let mut prompter = prompter(args.non_interactive);
    let resolved = resolver::resolve(
        &template,
        prompter.as_mut(),
        ResolveOptions::from_limit(args.max_attempts),
    )?;
    let replacements = resolved.compile()?;
    print_resolved(&out, &resolved, &replacements);

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let copied = tree::copy_tree(&args.template, &args.output)?;
    log::debug!("Copied {} file(s) into {}", copied, args.output.display());

    let report = TreeProcessor::new(&replacements).process(&args.output)?;
    print_report(&out, &report);

    println!(
        "{} Rendered {} into {}",
        emoji(&out, "✅", "[OK]"),
        resolved.name,
        args.output.display()
    );
    Ok(())
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .next()
        .is_none())
}
