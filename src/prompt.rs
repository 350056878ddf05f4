//! # Prompting
//!
//! Placeholder resolution and repository creation ask the user for input
//! through the [`Prompter`] trait. The library never talks to the terminal
//! directly, which keeps resolution testable and lets the CLI choose between
//! interactive and unattended operation.
//!
//! Three implementations are provided:
//!
//! - **`TerminalPrompter`**: interactive prompts rendered with `dialoguer`.
//! - **`NonInteractivePrompter`**: accepts every default and refuses to ask
//!   for free-form input. Used with `--non-interactive`.
//! - **`ScriptedPrompter`**: replays a fixed list of answers. Used by tests
//!   and automation.

use std::collections::VecDeque;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::error::{Error, Result};

/// Source of user decisions during resolution and repository creation.
pub trait Prompter {
    /// Ask for a line of text.
    ///
    /// When `forbidden` is set, answers containing it are rejected and the
    /// question is asked again. Implementations must never return such an
    /// answer.
    fn input(&mut self, label: &str, forbidden: Option<&str>) -> Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, label: &str, default: bool) -> Result<bool>;

    /// Ask the user to pick one of `items`, returning its index.
    fn select(&mut self, label: &str, items: &[&str], default: usize) -> Result<usize>;
}

/// Interactive prompts on the controlling terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, label: &str, forbidden: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true);

        if let Some(pattern) = forbidden {
            let pattern = pattern.to_string();
            input = input.validate_with(move |value: &String| -> std::result::Result<(), String> {
                if value.contains(&pattern) {
                    Err(format!("Value may not contain its own pattern {}", pattern))
                } else {
                    Ok(())
                }
            });
        }

        Ok(input.interact_text()?)
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(label)
            .default(default)
            .interact()?)
    }

    fn select(&mut self, label: &str, items: &[&str], default: usize) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(items)
            .default(default)
            .interact()?)
    }
}

/// Answers every confirmation with its default and refuses free-form input.
#[derive(Debug, Default)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn input(&mut self, label: &str, _forbidden: Option<&str>) -> Result<String> {
        Err(Error::Prompt {
            message: format!(
                "'{}' needs a value but prompting is disabled (use --set NAME=VALUE)",
                label
            ),
        })
    }

    fn confirm(&mut self, _label: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&mut self, label: &str, _items: &[&str], _default: usize) -> Result<usize> {
        Err(Error::Prompt {
            message: format!("'{}' needs a decision but prompting is disabled", label),
        })
    }
}

/// A single pre-recorded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Confirm(bool),
    Choice(usize),
}

/// Replays pre-recorded answers in order.
///
/// Text answers that contain the forbidden pattern are recorded in
/// [`ScriptedPrompter::rejected`] and skipped, just as an interactive user
/// would be asked again.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    /// Labels of every question asked, in order
    pub asked: Vec<String>,
    /// Answers refused because they contained a forbidden pattern
    pub rejected: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Number of answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, label: &str) -> Result<Answer> {
        self.asked.push(label.to_string());
        self.answers.pop_front().ok_or_else(|| Error::Prompt {
            message: format!("No scripted answer left for '{}'", label),
        })
    }

    fn mismatch(label: &str, expected: &str, answer: &Answer) -> Error {
        Error::Prompt {
            message: format!(
                "Expected {} answer for '{}', got {:?}",
                expected, label, answer
            ),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, label: &str, forbidden: Option<&str>) -> Result<String> {
        loop {
            match self.next(label)? {
                Answer::Text(text) => match forbidden {
                    Some(pattern) if text.contains(pattern) => self.rejected.push(text),
                    _ => return Ok(text),
                },
                other => return Err(Self::mismatch(label, "text", &other)),
            }
        }
    }

    fn confirm(&mut self, label: &str, _default: bool) -> Result<bool> {
        match self.next(label)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(Self::mismatch(label, "yes/no", &other)),
        }
    }

    fn select(&mut self, label: &str, items: &[&str], _default: usize) -> Result<usize> {
        match self.next(label)? {
            Answer::Choice(index) if index < items.len() => Ok(index),
            other => Err(Self::mismatch(label, "choice", &other)),
        }
    }
}
