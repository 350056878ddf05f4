//! # Resolution Driver
//!
//! Turns a [`Template`] into a [`ResolvedTemplate`]. One **pass** resolves
//! every placeholder through the [`Prompter`] and checks the dependency graph
//! of the resulting values:
//!
//! - a self reference is a configuration error and ends resolution;
//! - a cycle discards every value of the pass and starts over;
//! - an acyclic graph finishes resolution.
//!
//! Restarting the whole pass rather than re-asking only the placeholders on
//! the cycle keeps the driver simple. The number of passes can be bounded with
//! [`ResolveOptions::max_attempts`].

use crate::error::{Error, Result};
use crate::graph::{describe_cycle, DependencyGraph};
use crate::placeholder::{ResolvedPlaceholder, Resolve};
use crate::prompt::Prompter;
use crate::template::{ResolvedTemplate, Template};

/// Options controlling the resolution loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum number of passes. `None` retries until the values are acyclic.
    pub max_attempts: Option<usize>,
}

impl ResolveOptions {
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Build options from a command-line limit where `0` means unbounded.
    pub fn from_limit(limit: usize) -> Self {
        Self {
            max_attempts: (limit > 0).then_some(limit),
        }
    }
}

/// Result of a single resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Resolved(ResolvedTemplate),
    /// The values reference each other in a loop; `cycle` starts and ends
    /// with the same placeholder name.
    Cyclic { cycle: Vec<String> },
}

/// Resolve every placeholder once and classify the result.
pub fn resolve_pass(template: &Template, prompter: &mut dyn Prompter) -> Result<PassOutcome> {
    let placeholders = template
        .placeholders
        .iter()
        .map(|placeholder| placeholder.resolve(prompter))
        .collect::<Result<Vec<ResolvedPlaceholder>>>()?;

    let graph = DependencyGraph::build(&placeholders)?;
    if let Some(cycle) = graph.find_cycle() {
        return Ok(PassOutcome::Cyclic { cycle });
    }

    Ok(PassOutcome::Resolved(ResolvedTemplate {
        name: template.name.clone(),
        placeholders,
    }))
}

/// Run resolution passes until one is acyclic.
pub fn resolve(
    template: &Template,
    prompter: &mut dyn Prompter,
    options: ResolveOptions,
) -> Result<ResolvedTemplate> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match resolve_pass(template, prompter)? {
            PassOutcome::Resolved(resolved) => {
                log::debug!(
                    "Resolved template '{}' after {} pass(es)",
                    resolved.name,
                    attempts
                );
                return Ok(resolved);
            }
            PassOutcome::Cyclic { cycle } => {
                let cycle = describe_cycle(&cycle);
                log::warn!(
                    "Cycle detected in placeholder resolution: {} (attempt {})",
                    cycle,
                    attempts
                );
                if options.max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(Error::ResolutionExhausted { attempts, cycle });
                }
            }
        }
    }
}
