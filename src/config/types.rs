// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for labtohub.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, RemotesConfig, WorktreeConfig, PublishConfig
//! ```
//!
//! # Publish Strategy
//!
//! ```text
//! Strategy: Merge (default) | Squash
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// How the source tree lands on the target branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Commit on a content branch, then `merge --no-ff` into the staging branch.
    #[default]
    Merge,
    /// Single squash commit directly on the staging branch.
    Squash,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Squash => write!(f, "squash"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            _ => Err(ConfigError::InvalidValue {
                section: "publish".to_string(),
                key: "strategy".to_string(),
                message: format!("expected 'merge' or 'squash', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; empty disables file logging.
    pub log_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::Info,
            file_log_level: LogLevel::Trace,
            log_file: PathBuf::new(),
        }
    }
}

/// Names of the two remotes and the mirrored branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemotesConfig {
    /// Remote holding the authoritative history (GitLab). Never pushed to.
    pub source: String,
    /// Remote receiving the published history (GitHub).
    pub target: String,
    /// Branch mirrored from source to target.
    pub branch: String,
}

impl Default for RemotesConfig {
    fn default() -> Self {
        Self {
            source: "origin".to_string(),
            target: "github".to_string(),
            branch: "main".to_string(),
        }
    }
}

impl RemotesConfig {
    /// `refs/remotes/<source>/<branch>`
    #[must_use]
    pub fn source_ref(&self) -> String {
        format!("refs/remotes/{}/{}", self.source, self.branch)
    }

    /// `refs/remotes/<target>/<branch>`
    #[must_use]
    pub fn target_ref(&self) -> String {
        format!("refs/remotes/{}/{}", self.target, self.branch)
    }

    /// Short form such as `origin/main`.
    #[must_use]
    pub fn source_short(&self) -> String {
        format!("{}/{}", self.source, self.branch)
    }

    /// Short form such as `github/main`.
    #[must_use]
    pub fn target_short(&self) -> String {
        format!("{}/{}", self.target, self.branch)
    }
}

/// Temporary worktree settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorktreeConfig {
    /// Worktree directory, relative to the repository root.
    pub path: PathBuf,
    /// Local branch that tracks the target and is pushed.
    pub staging_branch: String,
}

impl Default for WorktreeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".labtohub-tmp"),
            staging_branch: "labtohub-main".to_string(),
        }
    }
}

/// Publish behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Strategy used when the CLI does not pick one.
    pub strategy: Strategy,
    /// Ask for confirmation before touching anything.
    pub confirm: bool,
    /// Branch name used when the message has no usable characters.
    pub default_branch: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Merge,
            confirm: true,
            default_branch: "new".to_string(),
        }
    }
}
