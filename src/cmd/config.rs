// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config loading and the `options` command.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::Result;
use crate::git::query;

/// Absolute work tree root containing `path`.
///
/// Outside a repository the path itself is returned, made absolute, so the
/// publish preflight can report it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_repo(path: &Path) -> Result<PathBuf> {
    match query::workdir(path) {
        Ok(root) => Ok(root),
        Err(_) => std::path::absolute(path)
            .with_context(|| format!("resolving repository path {}", path.display())),
    }
}

/// Loader for every configuration layer of a run in `repo`.
///
/// # Errors
///
/// Returns an error if a CLI override cannot be applied.
pub fn build_config_loader(cli: &Cli, repo: &Path) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(repo.join(DEFAULT_CONFIG_FILE));
    for path in &cli.global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    let overrides = cli
        .global
        .to_config_overrides()
        .into_iter()
        .chain(cli.publish.to_config_overrides());
    for (key, value) in overrides {
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}

/// Display current configuration options.
pub fn run_options_command(config: &Config, loaded_files: &[String]) {
    if loaded_files.is_empty() {
        println!("# built-in defaults");
    } else {
        for line in loaded_files {
            println!("# {line}");
        }
    }
    for line in config.format_options() {
        println!("{line}");
    }
}
