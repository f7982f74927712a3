// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for labtohub.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. labtohub.toml (repository root)
//! 3. --config FILE (repeatable)
//! 4. LABTOHUB_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! LABTOHUB_REMOTES__SOURCE=gitlab        → remotes.source = "gitlab"
//! LABTOHUB_WORKTREE__STAGING_BRANCH=pub  → worktree.staging_branch = "pub"
//! LABTOHUB_PUBLISH__STRATEGY=squash      → publish.strategy = "squash"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GlobalConfig, PublishConfig, RemotesConfig, WorktreeConfig};

/// File name looked up in the repository root.
pub const DEFAULT_CONFIG_FILE: &str = "labtohub.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "LABTOHUB";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Source/target remotes and mirrored branch.
    pub remotes: RemotesConfig,
    /// Temporary worktree.
    pub worktree: WorktreeConfig,
    /// Publish behaviour.
    pub publish: PublishConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use labtohub::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("labtohub.toml")
    ///     .with_env_prefix("LABTOHUB")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check cross-field constraints the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` for empty names and
    /// `ConfigError::InvalidValue` for conflicting ones.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let required = [
            ("remotes", "source", self.remotes.source.as_str()),
            ("remotes", "target", self.remotes.target.as_str()),
            ("remotes", "branch", self.remotes.branch.as_str()),
            (
                "worktree",
                "staging_branch",
                self.worktree.staging_branch.as_str(),
            ),
            (
                "publish",
                "default_branch",
                self.publish.default_branch.as_str(),
            ),
        ];
        for (section, key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section: section.to_string(),
                    key: key.to_string(),
                });
            }
        }

        if self.remotes.source == self.remotes.target {
            return Err(ConfigError::InvalidValue {
                section: "remotes".to_string(),
                key: "target".to_string(),
                message: format!(
                    "target must differ from source, both are '{}'",
                    self.remotes.source
                ),
            });
        }

        if self.worktree.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "worktree".to_string(),
                key: "path".to_string(),
            });
        }
        if self.worktree.path.is_absolute() {
            return Err(ConfigError::InvalidValue {
                section: "worktree".to_string(),
                key: "path".to_string(),
                message: format!(
                    "must be relative to the repository root, got '{}'",
                    self.worktree.path.display()
                ),
            });
        }
        if !self
            .worktree
            .path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(ConfigError::InvalidValue {
                section: "worktree".to_string(),
                key: "path".to_string(),
                message: format!(
                    "must name a directory inside the repository, got '{}'",
                    self.worktree.path.display()
                ),
            });
        }

        if self.worktree.staging_branch == self.remotes.branch {
            return Err(ConfigError::InvalidValue {
                section: "worktree".to_string(),
                key: "staging_branch".to_string(),
                message: format!(
                    "must differ from the published branch '{}'",
                    self.remotes.branch
                ),
            });
        }
        if self.worktree.staging_branch == self.publish.default_branch {
            return Err(ConfigError::InvalidValue {
                section: "worktree".to_string(),
                key: "staging_branch".to_string(),
                message: "must differ from publish.default_branch".to_string(),
            });
        }

        Ok(())
    }

    /// Log file path, if file logging is enabled.
    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        let path = self.global.log_file.as_path();
        (!path.as_os_str().is_empty()).then_some(path)
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.output_log_level",
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file", self.global.log_file.display().to_string());

        options.insert("remotes.source", self.remotes.source.clone());
        options.insert("remotes.target", self.remotes.target.clone());
        options.insert("remotes.branch", self.remotes.branch.clone());

        options.insert("worktree.path", self.worktree.path.display().to_string());
        options.insert(
            "worktree.staging_branch",
            self.worktree.staging_branch.clone(),
        );

        options.insert("publish.strategy", self.publish.strategy.to_string());
        options.insert("publish.confirm", self.publish.confirm.to_string());
        options.insert(
            "publish.default_branch",
            self.publish.default_branch.clone(),
        );

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
