//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a template
//! descriptor without creating anything.
//!
//! ## Functionality
//!
//! - **Descriptor Validation**: Parses the descriptor and checks names and
//!   patterns for duplicates and overlaps.
//! - **Cycle Detection**: Rejects defaults that reference themselves or each
//!   other in a loop, and prints the dependency order of the placeholders.
//! - **Usage Check**: When given a template directory, warns about patterns
//!   that occur in no file path or content.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use gitmake::defaults::{RESERVED_DIR, VCS_DIR};
use gitmake::output::{emoji, OutputConfig};
use gitmake::template::{self, Template};

/// Validate a template descriptor
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Template directory or descriptor file to validate.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating template: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.path.display()
    );

    let template_root = args.path.is_dir().then(|| args.path.clone());
    let loaded = match &template_root {
        Some(root) => template::load(root),
        None => template::from_file(&args.path),
    };
    let template = match loaded {
        Ok(template) => {
            println!(
                "{} Template descriptor is well-formed",
                emoji(&out, "✅", "[OK]")
            );
            template
        }
        Err(e) => {
            println!(
                "{} Template validation failed: {}",
                emoji(&out, "❌", "[ERR]"),
                e
            );
            return Err(anyhow::anyhow!("Template validation failed: {}", e));
        }
    };

    let mut has_warnings = false;

    println!("\n{} Template Summary:", emoji(&out, "📊", "[INFO]"));
    println!("   Name: {}", template.name);
    println!("   Placeholders: {}", template.placeholders.len());
    let with_default = template
        .placeholders
        .iter()
        .filter(|p| p.default.is_some())
        .count();
    println!("   With defaults: {}", with_default);
    let silent = template
        .placeholders
        .iter()
        .filter(|p| p.default.is_some() && !p.prompt)
        .count();
    println!("   Resolved without prompting: {}", silent);

    for placeholder in &template.placeholders {
        if placeholder.default.is_none() && !placeholder.prompt {
            println!(
                "{} Placeholder {} has no default and will be prompted for anyway",
                emoji(&out, "⚠️", "[WARN]"),
                placeholder.name
            );
            has_warnings = true;
        }
    }

    println!(
        "\n{} Checking placeholder dependencies...",
        emoji(&out, "🔄", "[CHECK]")
    );
    let graph = template.dependency_graph()?;
    println!(
        "{} No circular dependencies detected",
        emoji(&out, "✅", "[OK]")
    );
    for placeholder in &template.placeholders {
        let dependencies = graph.dependencies(&placeholder.name);
        if !dependencies.is_empty() {
            println!("   {} -> {}", placeholder.name, dependencies.join(", "));
        }
    }
    if let Some(order) = graph.topological_order() {
        println!("   Resolution order: {}", order.join(", "));
    }

    if let Some(root) = &template_root {
        println!(
            "\n{} Checking placeholder usage...",
            emoji(&out, "🔍", "[SCAN]")
        );
        let unused = unused_patterns(root, &template)?;
        if unused.is_empty() {
            println!(
                "{} Every placeholder pattern is used",
                emoji(&out, "✅", "[OK]")
            );
        }
        for pattern in unused {
            println!(
                "{} Pattern {} does not occur in the template",
                emoji(&out, "⚠️", "[WARN]"),
                pattern
            );
            has_warnings = true;
        }
    }

    println!("\n{} Validation Result:", emoji(&out, "🎯", "[RESULT]"));

    if has_warnings && args.strict {
        println!(
            "{} Template has warnings (strict mode enabled)",
            emoji(&out, "❌", "[ERR]")
        );
        return Err(anyhow::anyhow!("Template validation failed in strict mode"));
    }

    if has_warnings {
        println!(
            "{} Template is valid but has warnings",
            emoji(&out, "⚠️", "[WARN]")
        );
    } else {
        println!("{} Template is valid", emoji(&out, "✅", "[OK]"));
    }

    Ok(())
}

/// Patterns that occur in no relative path, file content, or other
/// placeholder default outside the reserved directory.
fn unused_patterns(root: &Path, template: &Template) -> Result<Vec<String>> {
    let mut unused: Vec<&str> = template
        .placeholders
        .iter()
        .map(|p| p.pattern.as_str())
        .collect();

    for placeholder in &template.placeholders {
        if let Some(default) = &placeholder.default {
            unused.retain(|pattern| !default.contains(pattern));
        }
    }

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && (e.file_name() == VCS_DIR || (e.depth() == 1 && e.file_name() == RESERVED_DIR)))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if unused.is_empty() {
            break;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative = relative.to_string_lossy();
        let content = fs::read(entry.path())?;
        let content = String::from_utf8_lossy(&content);
        unused.retain(|pattern| !relative.contains(pattern) && !content.contains(pattern));
    }

    Ok(unused.into_iter().map(str::to_string).collect())
}
