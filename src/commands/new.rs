//! # New Command Implementation
//!
//! This module implements the `new` subcommand, the main workflow of
//! `gitmake`:
//!
//! 1. **Clone**: the template repository is cloned into a working directory.
//!    Interactively, the URL is asked for again until a clone succeeds.
//! 2. **Load**: the descriptor is parsed and validated; `--set` values become
//!    fixed defaults.
//! 3. **Resolve**: placeholder values are asked for until they are acyclic.
//! 4. **Create**: the local template is cloned once more under the new
//!    repository name, rewritten, committed and force-pushed to the target
//!    remote. Failures offer retry, another template, or abort.
//! 5. **Repeat**: the user may create further repositories from the same
//!    template, each with freshly resolved values.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use gitmake::defaults::{
    DEFAULT_BRANCH, DEFAULT_COMMIT_MESSAGE, DEFAULT_MAX_ATTEMPTS, WORK_DIR_PREFIX,
};
use gitmake::git::{GitOperations, SystemGit};
use gitmake::output::{emoji, OutputConfig};
use gitmake::prompt::Prompter;
use gitmake::resolver::{self, ResolveOptions};
use gitmake::session::{CreateOptions, CreationOutcome, RepoCreator, RepoRequest};
use gitmake::template;

use super::{parse_assignments, print_report, print_resolved, prompter};

/// Create repositories from a template repository
#[derive(Args, Debug)]
pub struct NewArgs {
    /// URL or path of the template repository.
    ///
    /// Asked for interactively when omitted.
    /// Can also be set with the `GITMAKE_TEMPLATE` environment variable.
    #[arg(short, long, value_name = "URL", env = "GITMAKE_TEMPLATE")]
    pub template: Option<String>,

    /// Set a placeholder value without prompting (repeatable)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Directory in which the template and new repositories are checked out.
    ///
    /// Defaults to a temporary directory that is removed on exit.
    /// Can also be set with the `GITMAKE_WORK_DIR` environment variable.
    #[arg(long, value_name = "DIR", env = "GITMAKE_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Resolution passes before giving up on cyclic values (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Branch pushed to the target remote
    #[arg(long, value_name = "BRANCH", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Message of the initial commit
    #[arg(long, value_name = "MESSAGE", default_value = DEFAULT_COMMIT_MESSAGE)]
    pub message: String,

    /// Never prompt; every value must come from defaults or flags
    #[arg(long)]
    pub non_interactive: bool,

    /// Name of the first repository (may contain placeholder patterns)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Target remote of the first repository (may contain placeholder patterns)
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,
}

/// Execute the `new` command.
pub fn execute(args: NewArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let overrides = parse_assignments(&args.set)?;
    let options = ResolveOptions::from_limit(args.max_attempts);
    let create_options = CreateOptions {
        branch: args.branch.clone(),
        message: args.message.clone(),
    };

    // The temporary directory lives until the command returns
    let (work_dir, _temp_dir): (PathBuf, Option<TempDir>) = match &args.work_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            (dir.clone(), None)
        }
        None => {
            let temp = tempfile::Builder::new()
                .prefix(WORK_DIR_PREFIX)
                .tempdir()
                .context("Failed to create working directory")?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };
    let source_dir = work_dir.join("source");
    let repos_dir = work_dir.join("repos");
    fs::create_dir_all(&repos_dir)
        .with_context(|| format!("Failed to create {}", repos_dir.display()))?;

    let git = SystemGit::new();
    let mut prompter = prompter(args.non_interactive);
    let mut template_url = args.template.clone();
    let mut name = args.name.clone();
    let mut remote = args.remote.clone();

    loop {
        clone_template(
            &git,
            template_url.take(),
            &source_dir,
            prompter.as_mut(),
            args.non_interactive,
            &out,
        )?;
        let template = template::load(&source_dir)?.with_overrides(&overrides)?;
        println!(
            "{} Successfully loaded template {}",
            emoji(&out, "✅", "[OK]"),
            template.name
        );

        loop {
            let resolved = resolver::resolve(&template, prompter.as_mut(), options)?;
            let replacements = resolved.compile()?;
            print_resolved(&out, &resolved, &replacements);

            let request = RepoRequest {
                name: answer(name.take(), "Repository name", prompter.as_mut())?,
                remote_url: answer(remote.take(), "Target remote url", prompter.as_mut())?,
            };
            let creator = RepoCreator::new(&git, &replacements).with_options(create_options.clone());

            match creator.create_with_recovery(
                &repos_dir,
                &source_dir,
                prompter.as_mut(),
                Some(request),
            )? {
                CreationOutcome::Created(created) => {
                    print_report(&out, &created.report);
                    println!(
                        "{} Created {} and pushed to {}",
                        emoji(&out, "🎉", "[DONE]"),
                        created.request.name,
                        created.request.remote_url
                    );
                }
                CreationOutcome::Skipped => break,
                CreationOutcome::Aborted => {
                    println!("{} Aborted", emoji(&out, "🛑", "[STOP]"));
                    return Ok(());
                }
            }

            if !prompter.confirm("Create another repository from template?", false)? {
                return Ok(());
            }
        }
    }
}

fn answer(given: Option<String>, label: &str, prompter: &mut dyn Prompter) -> Result<String> {
    match given {
        Some(value) => Ok(value),
        None => Ok(prompter.input(label, None)?),
    }
}

/// Clone the template into `destination`, asking for another URL after a
/// failed clone when running interactively.
fn clone_template(
    git: &dyn GitOperations,
    mut url: Option<String>,
    destination: &Path,
    prompter: &mut dyn Prompter,
    non_interactive: bool,
    out: &OutputConfig,
) -> Result<()> {
    loop {
        let source = match url.take() {
            Some(url) => url,
            None => prompter.input("Template URL", None)?,
        };
        let source = local_source(&source);

        match git.clone_repo(&source, destination) {
            Ok(()) => {
                println!(
                    "{} Successfully cloned {}",
                    emoji(out, "✅", "[OK]"),
                    source
                );
                return Ok(());
            }
            Err(e) if non_interactive => return Err(e.into()),
            Err(e) => {
                println!("{} Could not clone {}: {}", emoji(out, "❌", "[ERR]"), source, e);
            }
        }
    }
}

/// Make local template paths absolute, since `git clone` runs elsewhere.
fn local_source(source: &str) -> String {
    let path = Path::new(source);
    if path.exists() {
        if let Ok(absolute) = fs::canonicalize(path) {
            return absolute.to_string_lossy().into_owned();
        }
    }
    source.to_string()
}
