// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations.
//!
//! ```text
//! query.rs --> GixBackend   --> .git/ (no subprocess)
//!          --> ShellBackend --> git rev-parse / merge-base / remote
//! ```
//!
//! Ref lookups use gix; history questions git answers with exit codes go
//! through the shell probes.

use crate::error::LabResult;
use std::path::{Path, PathBuf};

use super::backend::{GitQuery, GixBackend, ShellBackend};

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    GixBackend::is_git_repo(path)
}

/// Root of the work tree containing `path`.
///
/// # Errors
///
/// Returns `GitError::RepoNotFound` outside a repository.
pub fn workdir(path: &Path) -> LabResult<PathBuf> {
    GixBackend::workdir(path)
}

/// Get current branch name (None if HEAD is detached).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or head resolution fails.
pub fn current_branch(path: &Path) -> LabResult<Option<String>> {
    GixBackend::current_branch(path)
}

/// Whether a full reference name exists.
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or reference lookup fails.
pub fn reference_exists(path: &Path, name: &str) -> LabResult<bool> {
    GixBackend::reference_exists(path, name)
}

/// Linked worktrees registered in the repository, main worktree excluded.
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or the listing fails.
pub fn linked_worktrees(path: &Path) -> LabResult<Vec<PathBuf>> {
    GixBackend::linked_worktrees(path)
}

/// Whether `refs/heads/<branch>` exists.
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or reference lookup fails.
pub fn local_branch_exists(path: &Path, branch: &str) -> LabResult<bool> {
    GixBackend::reference_exists(path, &format!("refs/heads/{branch}"))
}

/// Names of all configured remotes.
///
/// # Errors
///
/// Returns a `GitError` if `git remote` fails.
pub fn remote_names(path: &Path) -> LabResult<Vec<String>> {
    ShellBackend::remote_names(path)
}

/// Commit id of `rev`, or `None` if it does not resolve.
///
/// # Errors
///
/// Returns a `GitError` if git fails for another reason.
pub fn rev_parse(path: &Path, rev: &str) -> LabResult<Option<String>> {
    ShellBackend::rev_parse(path, rev)
}

/// Tree id of `rev`.
///
/// # Errors
///
/// Returns a `GitError` if `rev` does not resolve to a commit.
pub fn tree_id(path: &Path, rev: &str) -> LabResult<String> {
    ShellBackend::tree_id(path, rev)
}

/// Best common ancestor of two commits, `None` for unrelated histories.
///
/// # Errors
///
/// Returns a `GitError` if either revision is invalid.
pub fn merge_base(path: &Path, a: &str, b: &str) -> LabResult<Option<String>> {
    ShellBackend::merge_base(path, a, b)
}

/// Whether `ancestor` is reachable from `descendant`.
///
/// # Errors
///
/// Returns a `GitError` if either revision is invalid.
pub fn is_ancestor(path: &Path, ancestor: &str, descendant: &str) -> LabResult<bool> {
    ShellBackend::is_ancestor(path, ancestor, descendant)
}
