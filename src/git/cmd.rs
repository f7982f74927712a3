// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using shell backend.
//!
//! ```text
//! cmd.rs --> ShellBackend --> git (fetch, worktree, commit, merge, push)
//! ```

use crate::error::{GitError, LabResult};
use std::path::Path;

use super::backend::{GitMutation, PushMode, ShellBackend};

/// Fetch a remote, optionally pruning deleted branches.
///
/// # Errors
///
/// Returns a `GitError` if the fetch operation fails.
pub fn fetch(repo_path: &Path, remote: &str, prune: bool) -> LabResult<()> {
    ShellBackend::fetch(repo_path, remote, prune)
}

/// Add a worktree at `path` on `branch`, reset to `start_point`.
///
/// # Errors
///
/// Returns a `GitError` if `git worktree add` fails.
pub fn worktree_add(repo_path: &Path, path: &Path, branch: &str, start_point: &str) -> LabResult<()> {
    ShellBackend::worktree_add(repo_path, path, branch, start_point)
}

/// Remove a worktree, discarding local changes in it.
///
/// # Errors
///
/// Returns a `GitError` if `git worktree remove` fails.
pub fn worktree_remove(repo_path: &Path, path: &Path) -> LabResult<()> {
    ShellBackend::worktree_remove(repo_path, path)
}

/// Prune stale worktree metadata.
///
/// # Errors
///
/// Returns a `GitError` if `git worktree prune` fails.
pub fn worktree_prune(repo_path: &Path) -> LabResult<()> {
    ShellBackend::worktree_prune(repo_path)
}

/// Create or reset `branch` at HEAD and switch to it.
///
/// # Errors
///
/// Returns a `GitError` if the switch fails.
pub fn switch_create(worktree: &Path, branch: &str) -> LabResult<()> {
    ShellBackend::switch_create(worktree, branch)
}

/// Switch to an existing branch.
///
/// # Errors
///
/// Returns a `GitError` if the switch fails.
pub fn switch(worktree: &Path, branch: &str) -> LabResult<()> {
    ShellBackend::switch(worktree, branch)
}

/// Replace the content of `worktree` with the tree of `source`.
///
/// Restores tracked paths from `source` (deleting those it lacks) and then
/// removes whatever is left untracked.
///
/// # Errors
///
/// Returns a `GitError` if `git restore` or `git clean` fails.
pub fn overlay_tree(worktree: &Path, source: &str) -> LabResult<()> {
    ShellBackend::restore_from(worktree, source)?;
    ShellBackend::clean(worktree)
}

/// Stage everything and commit, unless nothing changed.
///
/// Returns `true` when a commit was created.
///
/// # Errors
///
/// Returns a `GitError` if staging or committing fails.
pub fn commit_all(worktree: &Path, message: &str) -> LabResult<bool> {
    ShellBackend::add_all(worktree)?;
    if !ShellBackend::has_staged_changes(worktree)? {
        return Ok(false);
    }
    ShellBackend::commit(worktree, message)?;
    Ok(true)
}

/// Merge `branch` into HEAD with a merge commit.
///
/// # Errors
///
/// Returns a `GitError` if the merge fails.
pub fn merge_no_ff(worktree: &Path, branch: &str, message: &str) -> LabResult<()> {
    ShellBackend::merge_no_ff(worktree, branch, message)
}

/// Push `refspec` to `remote`.
///
/// `protected` names the remote whose history must never change; pushing to
/// it fails before git is invoked.
///
/// # Errors
///
/// Returns `GitError::ProtectedRemote` for the protected remote, or a
/// `GitError` if the push is rejected.
pub fn push(
    repo_path: &Path,
    remote: &str,
    refspec: &str,
    mode: PushMode<'_>,
    protected: &str,
) -> LabResult<()> {
    if remote == protected {
        return Err(GitError::ProtectedRemote {
            remote: remote.to_string(),
        }
        .into());
    }
    ShellBackend::push(repo_path, remote, refspec, mode)
}

/// Force-delete a local branch.
///
/// # Errors
///
/// Returns a `GitError` if the branch cannot be deleted.
pub fn delete_branch(repo_path: &Path, branch: &str) -> LabResult<()> {
    ShellBackend::delete_branch(repo_path, branch)
}

/// Move a local branch to `target`.
///
/// # Errors
///
/// Returns a `GitError` if the branch cannot be moved.
pub fn reset_branch(repo_path: &Path, branch: &str, target: &str) -> LabResult<()> {
    ShellBackend::reset_branch(repo_path, branch, target)
}
