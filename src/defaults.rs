//! Default values for gitmake.
//!
//! This module provides centralized constants used across commands, ensuring
//! consistency and avoiding duplication.

/// Directory at the template root that holds the descriptor. It is removed
/// from every generated repository.
pub const RESERVED_DIR: &str = "template";

/// Primary location of the template descriptor, relative to the template root.
pub const TEMPLATE_CONFIG_PATH: &str = "template/config.json";

/// Every descriptor location that is tried, in order.
pub const DESCRIPTOR_CANDIDATES: &[&str] = &[
    TEMPLATE_CONFIG_PATH,
    "template/config.yaml",
    "template/config.yml",
];

/// Version control metadata directory skipped while rewriting files.
pub const VCS_DIR: &str = ".git";

/// Branch pushed to the new remote.
pub const DEFAULT_BRANCH: &str = "master";

/// Message of the commit that records the substituted template.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initialize template";

/// Number of resolution passes before giving up on cyclic values.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Prefix of temporary working directories.
pub const WORK_DIR_PREFIX: &str = "gitmake";
