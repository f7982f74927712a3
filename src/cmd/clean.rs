// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `clean` command: remove what an interrupted run left behind.

use anyhow::Context;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::publish::worktree::remove_worktree;

/// Remove the temporary worktree of `repo` if one exists.
///
/// Returns `true` if something was removed.
///
/// # Errors
///
/// Returns an error if the path holds something other than a worktree of
/// `repo`, or if deleting or pruning fails.
pub fn run_clean_command(config: &Config, repo: &Path) -> Result<bool> {
    let path = repo.join(&config.worktree.path);
    let removed = remove_worktree(repo, &path)
        .with_context(|| format!("removing {}", path.display()))?;
    if removed {
        println!("Removed leftover worktree {}", path.display());
    } else {
        println!("No leftover worktree at {}", path.display());
    }
    Ok(removed)
}
