// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Temporary worktree lifetime.
//!
//! ```text
//! WorktreeGuard::create()  worktree add -B <staging> <path> <start>
//!        |
//!   track_branch()         content branch to delete later
//!        |
//!      Drop                worktree remove --force
//!                          rm -r <path>, worktree prune
//!                          branch -D <tracked...>
//! ```

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{LabResult, Result, bail_out};
use crate::git::{cmd, query};

/// RAII guard owning the temporary worktree and its throwaway branches.
///
/// Cleanup runs on every exit path, including early returns through `?`.
#[derive(Debug)]
pub struct WorktreeGuard {
    repo: PathBuf,
    path: PathBuf,
    branches: Vec<String>,
}

impl WorktreeGuard {
    /// Add a worktree at `path` with `branch` reset to `start_point`.
    ///
    /// The guard exists before `git worktree add` runs, so a half-created
    /// worktree is cleaned up as well.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the worktree cannot be added.
    pub fn create(repo: &Path, path: PathBuf, branch: &str, start_point: &str) -> LabResult<Self> {
        let guard = Self {
            repo: repo.to_path_buf(),
            path,
            branches: Vec::new(),
        };
        info!(
            path = %guard.path.display(),
            branch,
            start_point,
            "adding temporary worktree"
        );
        cmd::worktree_add(&guard.repo, &guard.path, branch, start_point)?;
        Ok(guard)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete `branch` when the guard is dropped.
    pub fn track_branch(&mut self, branch: impl Into<String>) {
        self.branches.push(branch.into());
    }
}

impl Drop for WorktreeGuard {
    fn drop(&mut self) {
        if let Err(e) = remove_worktree(&self.repo, &self.path) {
            warn!(path = %self.path.display(), "failed to remove temporary worktree: {e:#}");
        }
        for branch in &self.branches {
            match cmd::delete_branch(&self.repo, branch) {
                Ok(()) => debug!(branch, "deleted temporary branch"),
                Err(e) => warn!(branch, "failed to delete temporary branch: {e}"),
            }
        }
    }
}

/// Remove a worktree directory and its administrative data.
///
/// Works for registered worktrees, stale registrations and leftover
/// worktree directories whose registration was already pruned. Returns
/// `true` if anything was on disk.
///
/// # Errors
///
/// Refuses to touch a directory at `path` that is not a linked worktree of
/// `repo`. Also fails if the directory cannot be deleted or pruning fails.
pub fn remove_worktree(repo: &Path, path: &Path) -> Result<bool> {
    let existed = path.exists();
    if existed {
        if !is_linked_worktree(repo, path)? {
            return Err(bail_out(format!(
                "{} exists but is not a git worktree of {}; refusing to delete it",
                path.display(),
                repo.display()
            ))
            .into());
        }
        if let Err(e) = cmd::worktree_remove(repo, path) {
            debug!(path = %path.display(), "git worktree remove failed: {e}");
        }
        if path.exists() {
            std::fs::remove_dir_all(path)
                .with_context(|| format!("failed to delete {}", path.display()))?;
        }
    }
    cmd::worktree_prune(repo)?;
    Ok(existed)
}

/// Whether `path` is a linked worktree of `repo`.
///
/// Registered worktrees match by location. A directory whose registration
/// is gone still counts when its `.git` file points into `worktrees/`.
fn is_linked_worktree(repo: &Path, path: &Path) -> Result<bool> {
    let target = canonical(path);
    if target == canonical(repo) {
        return Ok(false);
    }
    let registered = query::linked_worktrees(repo)
        .with_context(|| format!("listing worktrees of {}", repo.display()))?;
    if registered.iter().any(|p| canonical(p) == target) {
        return Ok(true);
    }

    let dot_git = path.join(".git");
    if !dot_git.is_file() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(&dot_git)
        .with_context(|| format!("failed to read {}", dot_git.display()))?;
    Ok(content.lines().next().is_some_and(|line| {
        line.strip_prefix("gitdir:").is_some_and(|gitdir| {
            Path::new(gitdir.trim())
                .parent()
                .and_then(Path::file_name)
                .is_some_and(|name| name == "worktrees")
        })
    }))
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
