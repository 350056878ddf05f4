//! # Output Configuration
//!
//! Utilities for controlling CLI output appearance: whether colour and emoji
//! are used, and how placeholder patterns are highlighted in reports.
//!
//! ## Respecting User Preferences
//!
//! The following environment variables and flags are honoured:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gitmake::output::{emoji, highlight_patterns, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Processing...", emoji(&config, "🔧", "[RUN]"));
//! println!("{}", highlight_patterns(&config, "org.{{NAME}}", &["{{NAME}}"]));
//! ```

use std::env;

use console::{style, StyledObject};

use crate::placeholder::ResolvedPlaceholder;
use crate::substitute::{self, Literal};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Behavior
    /// - `--color=always`: Force colors on (overrides NO_COLOR)
    /// - `--color=never`: Force colors off
    /// - `--color=auto`: Detect based on environment
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Apply the colour decision to a styled value.
    pub fn paint<D>(&self, styled: StyledObject<D>) -> StyledObject<D> {
        styled.force_styling(self.use_color)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Render every occurrence of `patterns` in `text` magenta and bold.
pub fn highlight_patterns(config: &OutputConfig, text: &str, patterns: &[&str]) -> String {
    if !config.use_color {
        return text.to_string();
    }
    let highlights: Vec<Literal> = patterns
        .iter()
        .map(|pattern| {
            let rendered = config.paint(style(*pattern).magenta().bold()).to_string();
            Literal::new(*pattern, rendered)
        })
        .collect();
    substitute::apply_all(text, &highlights)
}

/// One report line for a resolved placeholder:
/// `[ OK ] NAME :: {{NAME}} = raw value = expanded value`.
pub fn resolved_line(
    config: &OutputConfig,
    placeholder: &ResolvedPlaceholder,
    patterns: &[&str],
    expanded: &str,
) -> String {
    format!(
        "{} {} {} {} {} {} {} {}",
        config.paint(style(emoji(config, "✅", "[ OK ]")).green().bold()),
        config.paint(style(&placeholder.name).cyan().bold()),
        config.paint(style("::").green()),
        config.paint(style(&placeholder.pattern).magenta().bold()),
        config.paint(style("=").green()),
        highlight_patterns(config, &placeholder.value, patterns),
        config.paint(style("=").green()),
        config.paint(style(expanded).cyan().bold()),
    )
}
