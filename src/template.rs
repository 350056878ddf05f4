//! # Template Descriptor
//!
//! Every template repository carries a descriptor at
//! [`TEMPLATE_CONFIG_PATH`](crate::defaults::TEMPLATE_CONFIG_PATH):
//!
//! ```json
//! {
//!   "name": "service",
//!   "placeholders": [
//!     { "name": "NAME", "description": "Project name", "pattern": "{{NAME}}" },
//!     { "name": "PACKAGE", "pattern": "{{PACKAGE}}", "prompt": false,
//!       "resolution": "org.example.{{NAME}}" }
//!   ]
//! }
//! ```
//!
//! YAML descriptors (`template/config.yaml` or `template/config.yml`) use the
//! same fields.
//!
//! Loading always validates. A descriptor is rejected when names or patterns
//! repeat, a pattern is empty or contains another pattern, or the defaults
//! already reference themselves or form a cycle.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::DESCRIPTOR_CANDIDATES;
use crate::error::{Error, Result};
use crate::graph::{describe_cycle, DependencyGraph};
use crate::placeholder::{Placeholder, ResolvedPlaceholder};
use crate::replacement::ReplacementSet;
use crate::suggestions;

/// A parsed template descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
}

/// A template whose placeholders all carry values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub name: String,
    pub placeholders: Vec<ResolvedPlaceholder>,
}

/// Parse a JSON descriptor without validating it.
pub fn parse_json(content: &str) -> Result<Template> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a YAML descriptor without validating it.
pub fn parse_yaml(content: &str) -> Result<Template> {
    Ok(serde_yaml::from_str(content)?)
}

/// Find the descriptor inside a template root.
pub fn locate(template_root: &Path) -> Result<PathBuf> {
    DESCRIPTOR_CANDIDATES
        .iter()
        .map(|candidate| template_root.join(candidate))
        .find(|path| path.is_file())
        .ok_or_else(|| suggestions::descriptor_not_found(template_root))
}

/// Read, parse and validate a descriptor file.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as
/// JSON.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Template> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let template = if is_yaml {
        parse_yaml(&content)?
    } else {
        parse_json(&content)?
    };

    log::debug!(
        "Loaded template '{}' with {} placeholder(s) from {}",
        template.name,
        template.placeholders.len(),
        path.display()
    );
    template.validate()?;
    Ok(template)
}

/// Locate and load the descriptor of a template root.
pub fn load(template_root: &Path) -> Result<Template> {
    from_file(locate(template_root)?)
}

/// Split a `NAME=VALUE` assignment. The value may contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(suggestions::malformed_assignment(raw)),
    }
}

impl Template {
    /// Check the descriptor for configuration errors.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "Template name is empty".to_string(),
                hint: Some("Set the 'name' field of the template descriptor".to_string()),
            });
        }

        let mut names = HashSet::new();
        let mut patterns = HashSet::new();
        for placeholder in &self.placeholders {
            if placeholder.name.is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("Placeholder with pattern '{}' has no name", placeholder.pattern),
                    hint: None,
                });
            }
            if !names.insert(placeholder.name.as_str()) {
                return Err(Error::ConfigParse {
                    message: format!("Duplicate placeholder name '{}'", placeholder.name),
                    hint: Some("Placeholder names must be unique".to_string()),
                });
            }
            if placeholder.pattern.is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("Placeholder {} has an empty pattern", placeholder.name),
                    hint: Some("Use a distinctive token such as {{NAME}}".to_string()),
                });
            }
            if !patterns.insert(placeholder.pattern.as_str()) {
                return Err(Error::ConfigParse {
                    message: format!("Duplicate placeholder pattern '{}'", placeholder.pattern),
                    hint: Some("Every placeholder needs its own pattern".to_string()),
                });
            }
        }

        for outer in &self.placeholders {
            for inner in &self.placeholders {
                if outer.name != inner.name && outer.pattern.contains(&inner.pattern) {
                    return Err(suggestions::overlapping_patterns(&outer.pattern, &inner.pattern));
                }
            }
        }

        let graph = self.dependency_graph()?;
        if let Some(cycle) = graph.find_cycle() {
            return Err(Error::CycleDetected {
                cycle: describe_cycle(&cycle),
            });
        }
        Ok(())
    }

    /// Graph over the descriptor defaults.
    pub fn dependency_graph(&self) -> Result<DependencyGraph> {
        DependencyGraph::build(&self.placeholders)
    }

    pub fn placeholder(&self, name: &str) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.name == name)
    }

    pub fn placeholder_names(&self) -> Vec<&str> {
        self.placeholders.iter().map(|p| p.name.as_str()).collect()
    }

    /// Apply `NAME=VALUE` overrides as defaults that are never prompted for.
    ///
    /// The result is validated again, so overrides that reference their own
    /// pattern or close a cycle are rejected.
    pub fn with_overrides(mut self, overrides: &[(String, String)]) -> Result<Self> {
        for (name, value) in overrides {
            let Some(index) = self.placeholders.iter().position(|p| &p.name == name) else {
                return Err(suggestions::unknown_placeholder(name, &self.placeholder_names()));
            };
            let placeholder = &mut self.placeholders[index];
            placeholder.default = Some(value.clone());
            placeholder.prompt = false;
        }
        self.validate()?;
        Ok(self)
    }
}

impl ResolvedTemplate {
    pub fn dependency_graph(&self) -> Result<DependencyGraph> {
        DependencyGraph::build(&self.placeholders)
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedPlaceholder> {
        self.placeholders.iter().find(|p| p.name == name)
    }

    /// Compile the placeholders into replacement nodes.
    pub fn compile(&self) -> Result<ReplacementSet> {
        ReplacementSet::compile(&self.placeholders)
    }
}
