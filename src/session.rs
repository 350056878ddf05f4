//! # Repository Creation
//!
//! A [`RepoCreator`] turns a local template checkout into a new repository:
//!
//! 1. clone the template into `<work dir>/<name>`;
//! 2. run the [`TreeProcessor`] over the clone;
//! 3. stage everything, commit, point `origin` at the target remote and
//!    force-push.
//!
//! The repository name and remote URL are asked for with the
//! [`Prompter`] and passed through the replacement set, so answers may use
//! placeholder patterns such as `{{NAME}}-service`.
//!
//! Any failure ends the attempt. [`RepoCreator::create_with_recovery`] then
//! lets the user retry with a new name and remote, move on to another
//! template, or abort.

use std::path::{Component, Path, PathBuf};

use crate::defaults::{DEFAULT_BRANCH, DEFAULT_COMMIT_MESSAGE};
use crate::error::{Error, Result};
use crate::git::GitOperations;
use crate::prompt::Prompter;
use crate::replacement::ReplacementSet;
use crate::tree::{TreeProcessor, TreeReport};

/// Choices offered after a failed attempt, in menu order.
pub const RECOVERY_CHOICES: [&str; 3] = ["Retry", "Other template", "Abort"];

/// Name and remote of the repository to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRequest {
    pub name: String,
    pub remote_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Branch pushed to the remote
    pub branch: String,
    /// Message of the initial commit
    pub message: String,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

/// A successfully pushed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRepo {
    pub repo_dir: PathBuf,
    pub request: RepoRequest,
    pub report: TreeReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    Created(CreatedRepo),
    /// The user chose to continue with another template.
    Skipped,
    /// The user chose to stop.
    Aborted,
}

pub struct RepoCreator<'a, G: GitOperations + ?Sized> {
    git: &'a G,
    replacements: &'a ReplacementSet,
    options: CreateOptions,
}

impl<'a, G: GitOperations + ?Sized> RepoCreator<'a, G> {
    pub fn new(git: &'a G, replacements: &'a ReplacementSet) -> Self {
        Self {
            git,
            replacements,
            options: CreateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CreateOptions) -> Self {
        self.options = options;
        self
    }

    /// Ask for the repository name and remote URL, expanding placeholder
    /// patterns in both answers.
    pub fn request(&self, prompter: &mut dyn Prompter) -> Result<RepoRequest> {
        let name = self.replacements.apply(&prompter.input("Repository name", None)?);
        let remote_url = self
            .replacements
            .apply(&prompter.input("Target remote url", None)?);
        Ok(RepoRequest { name, remote_url })
    }

    /// Expand placeholder patterns in a request given up front.
    pub fn expand(&self, request: RepoRequest) -> RepoRequest {
        RepoRequest {
            name: self.replacements.apply(&request.name),
            remote_url: self.replacements.apply(&request.remote_url),
        }
    }

    /// Run one creation attempt.
    pub fn create(
        &self,
        work_dir: &Path,
        template_root: &Path,
        request: &RepoRequest,
    ) -> Result<CreatedRepo> {
        validate_repo_name(&request.name)?;
        let repo_dir = work_dir.join(&request.name);

        self.git
            .clone_repo(&template_root.to_string_lossy(), &repo_dir)?;
        log::info!("Cloned local template into {}", repo_dir.display());

        let report = TreeProcessor::new(self.replacements).process(&repo_dir)?;

        self.git.stage_all(&repo_dir)?;
        self.git.commit(&repo_dir, &self.options.message)?;
        self.git.set_remote(&repo_dir, &request.remote_url)?;
        self.git.force_push(&repo_dir, &self.options.branch)?;
        log::info!(
            "Pushed {} to {} ({})",
            request.name,
            request.remote_url,
            self.options.branch
        );

        Ok(CreatedRepo {
            repo_dir,
            request: request.clone(),
            report,
        })
    }

    /// Create a repository, offering retry / other template / abort when an
    /// attempt fails.
    ///
    /// Retrying asks for a new name and remote. When the prompter cannot
    /// answer the recovery question, the failure itself is returned.
    pub fn create_with_recovery(
        &self,
        work_dir: &Path,
        template_root: &Path,
        prompter: &mut dyn Prompter,
        initial: Option<RepoRequest>,
    ) -> Result<CreationOutcome> {
        let mut request = match initial {
            Some(request) => self.expand(request),
            None => self.request(prompter)?,
        };

        loop {
            let err = match self.create(work_dir, template_root, &request) {
                Ok(created) => return Ok(CreationOutcome::Created(created)),
                Err(err) => err,
            };
            log::error!("An error occurred while creating {}: {}", request.name, err);

            let Ok(choice) = prompter.select("Try again?", &RECOVERY_CHOICES, 0) else {
                return Err(err);
            };
            match choice {
                0 => request = self.request(prompter)?,
                1 => return Ok(CreationOutcome::Skipped),
                _ => return Ok(CreationOutcome::Aborted),
            }
        }
    }
}

/// A repository name must be a single, normal path component.
fn validate_repo_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::Path {
            message: format!("Invalid repository name '{}'", name),
        }),
    }
}
