//! # File Tree Processor
//!
//! Applies a [`ReplacementSet`] to a checked-out template, in place.
//!
//! ## Process
//!
//! 1.  **Reserved directory**: `template/` at the root holds the descriptor
//!     and is deleted without being substituted.
//!
//! 2.  **Collect entries**: the tree is walked once with `walkdir` before
//!     anything is changed, so files written at new paths are never visited
//!     again. `.git` directories are not entered.
//!
//! 3.  **Process files**: each regular, writable file has its relative path
//!     (`/`-separated) and content substituted.
//!     - path changed: the substituted content is written at the new path,
//!       creating parent directories, and the original is deleted after the
//!       write succeeded;
//!     - only content changed: the file is overwritten in place;
//!     - nothing changed: the file is left untouched.
//!
//!     Content that is not UTF-8 is kept byte for byte; only its path is
//!     substituted.
//!
//! 4.  **Prune**: directories left empty by moved files are removed.
//!
//! Symlinks, read-only files, unreadable entries, files that cannot be
//! written and substituted paths that would leave the root are skipped, logged and listed in the
//! [`TreeReport`]. None of them stop the walk.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::defaults::{RESERVED_DIR, VCS_DIR};
use crate::error::{Error, Result};
use crate::replacement::ReplacementSet;

/// Why an entry was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Symlink,
    /// Sockets, FIFOs, devices
    NotRegular,
    ReadOnly,
    Unreadable(String),
    /// The relative path is not valid UTF-8
    NonUtf8Path,
    /// The substituted path is absolute, leaves the root, or points into
    /// `.git` or the reserved directory
    EscapesRoot(String),
    /// Writing the substituted file failed; the original is left in place
    WriteFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Symlink => write!(f, "symbolic link"),
            SkipReason::NotRegular => write!(f, "not a regular file"),
            SkipReason::ReadOnly => write!(f, "file is not writable"),
            SkipReason::Unreadable(reason) => write!(f, "unreadable: {}", reason),
            SkipReason::NonUtf8Path => write!(f, "path is not valid UTF-8"),
            SkipReason::EscapesRoot(target) => {
                write!(f, "substituted path '{}' leaves the repository", target)
            }
            SkipReason::WriteFailed(reason) => write!(f, "{}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// What happened to the tree. All paths are relative to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeReport {
    /// Every regular file that was examined
    pub processed: Vec<PathBuf>,
    /// Files overwritten in place
    pub rewritten: Vec<PathBuf>,
    /// Files deleted and written at a substituted path, as `(from, to)`
    pub moved: Vec<(PathBuf, PathBuf)>,
    pub skipped: Vec<SkippedEntry>,
    /// Whether the reserved descriptor directory was deleted
    pub reserved_removed: bool,
}

impl TreeReport {
    /// Number of files whose path or content changed.
    pub fn changed(&self) -> usize {
        self.rewritten.len() + self.moved.len()
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        log::warn!("Skipping {}: {}", path.display(), reason);
        self.skipped.push(SkippedEntry { path, reason });
    }
}

/// Rewrites a directory tree with one replacement set.
pub struct TreeProcessor<'a> {
    replacements: &'a ReplacementSet,
}

impl<'a> TreeProcessor<'a> {
    pub fn new(replacements: &'a ReplacementSet) -> Self {
        Self { replacements }
    }

    /// Process the tree rooted at `root`.
    pub fn process(&self, root: &Path) -> Result<TreeReport> {
        let mut report = TreeReport {
            reserved_removed: remove_reserved_dir(root)?,
            ..TreeReport::default()
        };

        let mut entries = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !(e.file_type().is_dir() && e.file_name() == VCS_DIR))
        {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => {}
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    let path = err
                        .path()
                        .map(|p| relative_to(root, p))
                        .unwrap_or_default();
                    report.skip(path, SkipReason::Unreadable(err.to_string()));
                }
            }
        }

        for entry in entries {
            let relative = relative_to(root, entry.path());
            let file_type = entry.file_type();
            if file_type.is_symlink() {
                report.skip(relative, SkipReason::Symlink);
                continue;
            }
            if !file_type.is_file() {
                report.skip(relative, SkipReason::NotRegular);
                continue;
            }
            self.process_file(root, entry.path(), relative, &mut report)?;
        }

        log::debug!(
            "Processed {} file(s): {} rewritten, {} moved, {} skipped",
            report.processed.len(),
            report.rewritten.len(),
            report.moved.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn process_file(
        &self,
        root: &Path,
        path: &Path,
        relative: PathBuf,
        report: &mut TreeReport,
    ) -> Result<()> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                report.skip(relative, SkipReason::Unreadable(err.to_string()));
                return Ok(());
            }
        };
        if metadata.permissions().readonly() {
            report.skip(relative, SkipReason::ReadOnly);
            return Ok(());
        }

        let Some(relative_str) = slash_path(&relative) else {
            report.skip(relative, SkipReason::NonUtf8Path);
            return Ok(());
        };

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                report.skip(relative, SkipReason::Unreadable(err.to_string()));
                return Ok(());
            }
        };

        let new_relative = self.replacements.apply(&relative_str);
        if new_relative != relative_str && !stays_inside(&new_relative) {
            report.skip(relative, SkipReason::EscapesRoot(new_relative));
            return Ok(());
        }

        let (content, content_changed) = match String::from_utf8(bytes) {
            Ok(text) => {
                let substituted = self.replacements.apply(&text);
                let changed = substituted != text;
                (substituted.into_bytes(), changed)
            }
            Err(err) => (err.into_bytes(), false),
        };

        if new_relative != relative_str {
            let target = root.join(&new_relative);
            if let Err(reason) = move_file(path, &target, &content, metadata.permissions()) {
                report.skip(relative, SkipReason::WriteFailed(reason));
                return Ok(());
            }

            log::debug!("Moved {} to {}", relative_str, new_relative);
            if let Some(parent) = path.parent() {
                prune_empty_dirs(root, parent);
            }
            report.processed.push(relative.clone());
            report.moved.push((relative, PathBuf::from(new_relative)));
        } else if content_changed {
            if let Err(e) = fs::write(path, &content) {
                report.skip(
                    relative,
                    SkipReason::WriteFailed(format!("failed to write '{}': {}", path.display(), e)),
                );
                return Ok(());
            }
            log::debug!("Rewrote {}", relative_str);
            report.processed.push(relative.clone());
            report.rewritten.push(relative);
        } else {
            report.processed.push(relative);
        }

        Ok(())
    }
}

/// Copy a template tree into `destination`, leaving out `.git`.
///
/// Only directories and regular files are copied; other entries are logged
/// and ignored. Returns the number of files copied.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(source)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != VCS_DIR)
    {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to read template: {}", e),
        })?;
        let target = destination.join(relative_to(source, entry.path()));

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", target.display(), e),
            })?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(|e| Error::Filesystem {
                message: format!("Failed to copy '{}': {}", entry.path().display(), e),
            })?;
            copied += 1;
        } else {
            log::warn!("Not copying {}: not a regular file", entry.path().display());
        }
    }
    Ok(copied)
}

fn remove_reserved_dir(root: &Path) -> Result<bool> {
    let reserved = root.join(RESERVED_DIR);
    match fs::symlink_metadata(&reserved) {
        Ok(metadata) if metadata.is_dir() => {
            fs::remove_dir_all(&reserved).map_err(|e| Error::Filesystem {
                message: format!("Failed to remove '{}': {}", reserved.display(), e),
            })?;
            log::debug!("Removed reserved directory {}", reserved.display());
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Join the components of a relative path with `/`.
fn slash_path(path: &Path) -> Option<String> {
    let parts = path
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Write `content` at `target` with `permissions`, then remove `source`.
///
/// `source` is only removed once the new file is complete.
fn move_file(
    source: &Path,
    target: &Path,
    content: &[u8],
    permissions: fs::Permissions,
) -> std::result::Result<(), String> {
    // Case-only renames on case-insensitive filesystems
    let same_file = matches!(
        (fs::canonicalize(source), fs::canonicalize(target)),
        (Ok(a), Ok(b)) if a == b
    );

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create directory '{}': {}", parent.display(), e))?;
    }
    fs::write(target, content)
        .map_err(|e| format!("failed to write '{}': {}", target.display(), e))?;
    fs::set_permissions(target, permissions)
        .map_err(|e| format!("failed to set permissions on '{}': {}", target.display(), e))?;
    if !same_file {
        fs::remove_file(source)
            .map_err(|e| format!("failed to remove '{}': {}", source.display(), e))?;
    }
    Ok(())
}

/// A substituted relative path may not be empty or absolute, leave the
/// root, enter a `.git` directory, or start with the reserved directory.
fn stays_inside(relative: &str) -> bool {
    let path = Path::new(relative);
    if relative.is_empty()
        || !path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return false;
    }

    let mut names = path.components().filter_map(|c| match c {
        Component::Normal(name) => name.to_str(),
        _ => None,
    });
    let starts_reserved = names.clone().next() == Some(RESERVED_DIR);
    !starts_reserved && !names.any(|name| name == VCS_DIR)
}

/// Remove `dir` and its parents while they are empty, stopping at `root`.
fn prune_empty_dirs(root: &Path, dir: &Path) {
    let mut current = Some(dir);
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        let is_empty = fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !is_empty || fs::remove_dir(dir).is_err() {
            break;
        }
        log::debug!("Pruned empty directory {}", dir.display());
        current = dir.parent();
    }
}
