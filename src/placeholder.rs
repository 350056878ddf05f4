//! # Placeholders
//!
//! A placeholder is a named, pattern-keyed substitution point. Its optional
//! default may reference other placeholders by containing their patterns.
//!
//! Resolving a placeholder turns it into a [`ResolvedPlaceholder`] with a
//! mandatory value:
//!
//! - already resolved placeholders are returned unchanged;
//! - without a default the user is asked for a value, which may not contain
//!   the placeholder's own pattern;
//! - with a default and `prompt` set, the user may override the default;
//! - with a default and `prompt` unset, the default is used as is.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::prompt::Prompter;

/// Name, pattern and raw value of something that takes part in dependency
/// analysis.
pub trait PatternSource {
    fn name(&self) -> &str;
    fn pattern(&self) -> &str;

    /// The value before expansion, if one is known yet.
    fn raw_value(&self) -> Option<&str>;
}

/// A placeholder as declared in the template descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Unique name shown to the user.
    pub name: String,
    /// Free-form explanation shown next to the prompt.
    #[serde(default)]
    pub description: String,
    /// Literal token replaced everywhere in the template.
    pub pattern: String,
    /// Whether the user is asked even when a default exists.
    #[serde(default = "default_prompt")]
    pub prompt: bool,
    /// Default value, which may contain other placeholders' patterns.
    #[serde(
        default,
        rename = "resolution",
        alias = "default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,
}

fn default_prompt() -> bool {
    true
}

/// A placeholder with a concrete value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlaceholder {
    pub name: String,
    pub description: String,
    pub pattern: String,
    pub prompt: bool,
    pub value: String,
}

/// Anything that can produce a [`ResolvedPlaceholder`].
pub trait Resolve {
    fn resolve(&self, prompter: &mut dyn Prompter) -> Result<ResolvedPlaceholder>;
}

impl Placeholder {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            pattern: pattern.into(),
            prompt: true,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach a value without asking anybody.
    pub fn resolve_with(&self, value: impl Into<String>) -> ResolvedPlaceholder {
        ResolvedPlaceholder {
            name: self.name.clone(),
            description: self.description.clone(),
            pattern: self.pattern.clone(),
            prompt: self.prompt,
            value: value.into(),
        }
    }

    fn ask_value(&self, prompter: &mut dyn Prompter) -> Result<String> {
        let label = if self.description.is_empty() {
            format!("Placeholder {} value?", self.name)
        } else {
            format!("Placeholder {} value? ({})", self.name, self.description)
        };
        prompter.input(&label, Some(&self.pattern))
    }

    fn ask_override(&self, prompter: &mut dyn Prompter, default: &str) -> Result<String> {
        let label = format!(
            "Placeholder {} has existing resolution '{}' - Override?",
            self.name, default
        );
        if prompter.confirm(&label, false)? {
            self.ask_value(prompter)
        } else {
            Ok(default.to_string())
        }
    }
}

impl Resolve for Placeholder {
    fn resolve(&self, prompter: &mut dyn Prompter) -> Result<ResolvedPlaceholder> {
        let value = match &self.default {
            None => self.ask_value(prompter)?,
            Some(default) if self.prompt => self.ask_override(prompter, default)?,
            Some(default) => default.clone(),
        };
        Ok(self.resolve_with(value))
    }
}

impl Resolve for ResolvedPlaceholder {
    fn resolve(&self, _prompter: &mut dyn Prompter) -> Result<ResolvedPlaceholder> {
        Ok(self.clone())
    }
}

impl PatternSource for Placeholder {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn raw_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

impl PatternSource for ResolvedPlaceholder {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn raw_value(&self) -> Option<&str> {
        Some(&self.value)
    }
}
