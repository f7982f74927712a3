// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! ```text
//! lowest   labtohub.toml in the repository   (optional)
//!          --config files, in order          (required)
//!          LABTOHUB_<SECTION>__<KEY>
//! highest  CLI overrides                     set("section.key", value)
//!                 |
//!               build() --> Config::validate()
//! ```

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use std::fmt;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::Result;

/// A configuration source that was added to the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// File that must exist.
    Required(PathBuf),
    /// File that existed when it was added.
    Optional(PathBuf),
    /// TOML given as a string.
    Inline,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(path) => write!(f, "[file] {}", path.display()),
            Self::Optional(path) => write!(f, "[optional] {}", path.display()),
            Self::Inline => f.write_str("[inline]"),
        }
    }
}

/// Collects configuration layers; later layers win.
#[derive(Default)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<Source>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a TOML file; `build()` fails if it is missing or malformed.
    #[must_use]
    pub fn add_toml_file(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.add_file(path, true, Some(Source::Required(path.to_path_buf())))
    }

    /// Add a TOML file that is skipped when absent.
    #[must_use]
    pub fn add_toml_file_optional(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let source = path.exists().then(|| Source::Optional(path.to_path_buf()));
        self.add_file(path, false, source)
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(Source::Inline);
        self
    }

    fn add_file(mut self, path: &Path, required: bool, source: Option<Source>) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        self.sources.extend(source);
        self
    }

    /// Read `<PREFIX>_<SECTION>__<KEY>` variables.
    ///
    /// The double underscore keeps keys such as `staging_branch` intact.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Override `section.key` above every other layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the key path is malformed.
    pub fn set(mut self, key: &str, value: impl Into<config::Value>) -> Result<Self> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge all layers, deserialize and validate.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing required file, malformed TOML, an
    /// unknown key, a value of the wrong type, or a failed cross-field check.
    pub fn build(self) -> Result<Config> {
        let mut builder = self.builder;
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> &[Source] {
        &self.sources
    }

    /// Numbered list of the sources, lowest precedence first.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}. {source}", i + 1))
            .collect()
    }
}
