// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            LabError (~24 bytes)
//!                   |
//!   +-------+-------+-------+-------+
//!   |       |       |       |       |
//!   v       v       v       v       v
//! Bail     Git     Cfg    Proc   Prompt
//!          Box     Box     Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Git     Gix, CommandFailed, RemoteNotFound, ProtectedRemote, Diverged
//!   Config  MissingKey, InvalidValue
//!   Process ExecutableNotFound, SpawnFailed
//!   Prompt  Dialog, Aborted, EmptyMessage
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`LabError`].
pub type LabResult<T> = std::result::Result<T, LabError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
/// Boxed variants display the inner error as-is so `{e:#}` chains stay
/// free of repeated text.
#[derive(Debug, Error)]
pub enum LabError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Git operation failed.
    #[error(transparent)]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error(transparent)]
    Process(#[from] Box<ProcessError>),

    /// Interactive prompt error.
    #[error(transparent)]
    Prompt(#[from] Box<PromptError>),
}

/// Create a fatal [`LabError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> LabError {
    LabError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for LabError {
                fn from(err: $error) -> Self {
                    LabError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ConfigError => Config,
    ProcessError => Process,
    PromptError => Prompt,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to look up a reference.
    #[error("failed to find reference")]
    Reference(#[from] gix::reference::find::existing::Error),

    /// Failed to list linked worktrees.
    #[error("failed to list worktrees")]
    Worktrees(#[source] std::io::Error),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error(transparent)]
    Gix(#[from] GixError),

    /// Remote is not configured in the repository.
    #[error("remote not found: {remote}")]
    RemoteNotFound { remote: String },

    /// Branch not found on a remote after fetching.
    #[error("branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// Attempted to push to a remote whose history must never be rewritten.
    #[error("refusing to push to protected remote '{remote}'")]
    ProtectedRemote { remote: String },

    /// Local staging branch has commits the target does not have.
    #[error("local branch '{branch}' has diverged from {upstream}")]
    DivergedHistory { branch: String, upstream: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}'")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Prompt Errors ---

/// Interactive prompt errors.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The terminal dialog failed (no TTY, I/O error).
    #[error("dialog failed")]
    Dialog(#[from] dialoguer::Error),

    /// User declined to continue.
    #[error("aborted by user")]
    Aborted,

    /// Message was empty after trimming.
    #[error("message must not be empty")]
    EmptyMessage,
}
