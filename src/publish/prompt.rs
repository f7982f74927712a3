// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive questions asked during a publish.
//!
//! ```text
//! Prompter
//!   TerminalPrompter  dialoguer Input / Confirm
//!   AssumeYes<P>      confirm() -> true, message() delegated
//! ```

use dialoguer::{Confirm, Input};

use crate::error::PromptError;

/// Source of user answers.
pub trait Prompter {
    /// Ask for the commit/merge message.
    ///
    /// # Errors
    ///
    /// Returns a `PromptError` if no message can be obtained.
    fn message(&self) -> Result<String, PromptError>;

    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns a `PromptError` if the terminal dialog fails.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, PromptError>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn message(&self) -> Result<String, PromptError> {
        let message: String = Input::new()
            .with_prompt("Enter merge message")
            .interact_text()?;
        Ok(message)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Answers every confirmation with yes (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes<P>(pub P);

impl<P: Prompter> Prompter for AssumeYes<P> {
    fn message(&self) -> Result<String, PromptError> {
        self.0.message()
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool, PromptError> {
        tracing::debug!(prompt, "assuming yes");
        Ok(true)
    }
}

/// Trim a message and reject it when nothing is left.
///
/// # Errors
///
/// Returns `PromptError::EmptyMessage` for blank input.
pub fn normalize_message(raw: &str) -> Result<String, PromptError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(PromptError::EmptyMessage)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Use the given message or ask for one.
///
/// # Errors
///
/// Returns a `PromptError` if prompting fails or the result is blank.
pub fn resolve_message(given: Option<&str>, prompter: &impl Prompter) -> Result<String, PromptError> {
    match given {
        Some(message) if !message.trim().is_empty() => normalize_message(message),
        _ => normalize_message(&prompter.message()?),
    }
}
