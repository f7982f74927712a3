// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//!                     --> ShellBackend (git CLI, fallback)
//! GitMutation (write) --> ShellBackend (git CLI)
//! probes (exit 0/1)   --> ShellBackend (merge-base, diff --quiet, ...)
//! ```

use crate::error::{GitError, GixError, LabResult, ProcessError};
use std::path::{Path, PathBuf};
use std::process::Output;
use tracing::{debug, trace};

/// How a push may move the remote branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode<'a> {
    /// Plain push, rejected by the remote unless it fast-forwards.
    FastForward,
    /// Overwrite the remote branch only if it still points at `expected`.
    /// `None` means the branch must not exist yet.
    ForceWithLease { expected: Option<&'a str> },
}

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
///
/// Implementors provide methods to inspect repository state without modification.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Root of the work tree containing `path`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if no repository is found or it is bare.
    fn workdir(path: &Path) -> LabResult<PathBuf>;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> LabResult<Option<String>>;

    /// Check whether a full reference name (`refs/remotes/github/main`) exists.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or reference lookup fails.
    fn reference_exists(path: &Path, name: &str) -> LabResult<bool>;

    /// Locations of the linked worktrees registered with the repository.
    ///
    /// The main work tree is not included.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or the listing fails.
    fn linked_worktrees(path: &Path) -> LabResult<Vec<PathBuf>>;
}

// --- Mutation Trait (Write operations) ---

/// Git mutation operations that modify repository state.
///
/// All of them go through the git CLI so that credential helpers, SSH
/// configuration and worktree bookkeeping behave exactly like a manual run.
pub trait GitMutation {
    /// Fetch a remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch operation fails.
    fn fetch(repo_path: &Path, remote: &str, prune: bool) -> LabResult<()>;

    /// Add a worktree at `path`, (re)creating `branch` at `start_point`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git worktree add` fails.
    fn worktree_add(repo_path: &Path, path: &Path, branch: &str, start_point: &str)
    -> LabResult<()>;

    /// Remove a worktree, discarding any changes in it.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git worktree remove` fails.
    fn worktree_remove(repo_path: &Path, path: &Path) -> LabResult<()>;

    /// Drop administrative data of worktrees whose directory is gone.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git worktree prune` fails.
    fn worktree_prune(repo_path: &Path) -> LabResult<()>;

    /// Create or reset `branch` at HEAD and switch to it.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the switch fails.
    fn switch_create(worktree: &Path, branch: &str) -> LabResult<()>;

    /// Switch to an existing branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the switch fails.
    fn switch(worktree: &Path, branch: &str) -> LabResult<()>;

    /// Make index and files match the tree of `source`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git restore` fails.
    fn restore_from(worktree: &Path, source: &str) -> LabResult<()>;

    /// Remove untracked files and directories.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git clean` fails.
    fn clean(worktree: &Path) -> LabResult<()>;

    /// Stage every change, including deletions.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git add` fails.
    fn add_all(worktree: &Path) -> LabResult<()>;

    /// Commit the index.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the commit fails.
    fn commit(worktree: &Path, message: &str) -> LabResult<()>;

    /// Merge `branch` into HEAD, always creating a merge commit.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the merge fails.
    fn merge_no_ff(worktree: &Path, branch: &str, message: &str) -> LabResult<()>;

    /// Push a refspec.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote rejects the push.
    fn push(repo_path: &Path, remote: &str, refspec: &str, mode: PushMode<'_>) -> LabResult<()>;

    /// Force-delete a local branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch cannot be deleted.
    fn delete_branch(repo_path: &Path, branch: &str) -> LabResult<()>;

    /// Point a local branch at `target` (`git branch -f`).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch cannot be moved.
    fn reset_branch(repo_path: &Path, branch: &str, target: &str) -> LabResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides read-only operations without spawning subprocesses.
pub struct GixBackend;

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    fn workdir(path: &Path) -> LabResult<PathBuf> {
        let not_found = || GitError::RepoNotFound {
            path: path.display().to_string(),
        };
        // gix reports the work tree relative to a relative start path.
        let start = std::path::absolute(path).map_err(|_| not_found())?;
        let repo = gix::discover(&start).map_err(|_| not_found())?;
        let workdir = repo
            .workdir()
            .ok_or(GitError::Gix(GixError::BareRepository))?;
        Ok(workdir.to_path_buf())
    }

    fn current_branch(path: &Path) -> LabResult<Option<String>> {
        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
        let head = repo.head_name().map_err(|e| GitError::Gix(GixError::Reference(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn reference_exists(path: &Path, name: &str) -> LabResult<bool> {
        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;

        match repo.find_reference(name) {
            Ok(_) => Ok(true),
            Err(gix::reference::find::existing::Error::NotFound { name: _ }) => Ok(false),
            Err(e) => Err(GitError::Gix(GixError::Reference(e)).into()),
        }
    }

    fn linked_worktrees(path: &Path) -> LabResult<Vec<PathBuf>> {
        let repo =
            gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
        let proxies = repo
            .worktrees()
            .map_err(|e| GitError::Gix(GixError::Worktrees(e)))?;
        Ok(proxies.iter().filter_map(|proxy| proxy.base().ok()).collect())
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
pub struct ShellBackend;

impl ShellBackend {
    fn spawn(args: &[&str], cwd: &Path) -> LabResult<Output> {
        use std::process::Command;

        debug!(cwd = %cwd.display(), "git {}", args.join(" "));

        Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound && cwd.is_dir() {
                    ProcessError::ExecutableNotFound {
                        name: "git".to_string(),
                    }
                    .into()
                } else {
                    ProcessError::SpawnFailed {
                        command: format!("git {}", args.join(" ")),
                        source: e,
                    }
                    .into()
                }
            })
    }

    fn failure(args: &[&str], output: &Output) -> GitError {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            output.status.code().map_or_else(
                || "terminated by signal".to_string(),
                |code| format!("exit code {code}"),
            )
        } else {
            stderr
        };
        GitError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            message,
        }
    }

    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// Returns trimmed stdout on exit code 0.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> LabResult<String> {
        let output = Self::spawn(args, cwd)?;
        if !output.status.success() {
            return Err(Self::failure(args, &output).into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        trace!(stdout = %stdout, "git output");
        Ok(stdout)
    }

    /// Execute a git command whose exit code 1 means "no".
    ///
    /// Returns `Some(stdout)` on 0, `None` on 1, and an error for anything else.
    pub(crate) fn git_probe(args: &[&str], cwd: &Path) -> LabResult<Option<String>> {
        let output = Self::spawn(args, cwd)?;
        match output.status.code() {
            Some(0) => Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            )),
            Some(1) => Ok(None),
            _ => Err(Self::failure(args, &output).into()),
        }
    }

    /// Names of all configured remotes.
    pub(crate) fn remote_names(repo_path: &Path) -> LabResult<Vec<String>> {
        let output = Self::git_command(&["remote"], repo_path)?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Commit id `rev` resolves to, if it exists.
    pub(crate) fn rev_parse(repo_path: &Path, rev: &str) -> LabResult<Option<String>> {
        let spec = format!("{rev}^{{commit}}");
        Self::git_probe(&["rev-parse", "--verify", "--quiet", &spec], repo_path)
    }

    /// Tree id of the commit `rev` resolves to.
    pub(crate) fn tree_id(repo_path: &Path, rev: &str) -> LabResult<String> {
        let spec = format!("{rev}^{{tree}}");
        Self::git_command(&["rev-parse", "--verify", &spec], repo_path)
    }

    /// Best common ancestor of two commits, `None` for unrelated histories.
    pub(crate) fn merge_base(repo_path: &Path, a: &str, b: &str) -> LabResult<Option<String>> {
        Self::git_probe(&["merge-base", a, b], repo_path)
    }

    /// Whether `ancestor` is reachable from `descendant`.
    pub(crate) fn is_ancestor(repo_path: &Path, ancestor: &str, descendant: &str) -> LabResult<bool> {
        Self::git_probe(
            &["merge-base", "--is-ancestor", ancestor, descendant],
            repo_path,
        )
        .map(|found| found.is_some())
    }

    /// Whether the index differs from HEAD.
    pub(crate) fn has_staged_changes(worktree: &Path) -> LabResult<bool> {
        Self::git_probe(&["diff", "--cached", "--quiet"], worktree).map(|same| same.is_none())
    }
}

fn path_arg<'a>(path: &'a Path, command: &str) -> LabResult<&'a str> {
    path.to_str().ok_or_else(|| {
        GitError::CommandFailed {
            command: format!("git {command}"),
            message: format!("path is not valid UTF-8: {}", path.display()),
        }
        .into()
    })
}

impl GitMutation for ShellBackend {
    fn fetch(repo_path: &Path, remote: &str, prune: bool) -> LabResult<()> {
        let mut args = vec!["fetch", "--quiet"];
        if prune {
            args.push("--prune");
        }
        args.push(remote);
        Self::git_command(&args, repo_path)?;
        Ok(())
    }

    fn worktree_add(
        repo_path: &Path,
        path: &Path,
        branch: &str,
        start_point: &str,
    ) -> LabResult<()> {
        let path_str = path_arg(path, "worktree add")?;
        Self::git_command(
            &[
                "worktree", "add", "--quiet", "--force", "-B", branch, path_str, start_point,
            ],
            repo_path,
        )?;
        Ok(())
    }

    fn worktree_remove(repo_path: &Path, path: &Path) -> LabResult<()> {
        let path_str = path_arg(path, "worktree remove")?;
        Self::git_command(&["worktree", "remove", "--force", path_str], repo_path)?;
        Ok(())
    }

    fn worktree_prune(repo_path: &Path) -> LabResult<()> {
        Self::git_command(&["worktree", "prune"], repo_path)?;
        Ok(())
    }

    fn switch_create(worktree: &Path, branch: &str) -> LabResult<()> {
        Self::git_command(&["switch", "--quiet", "-C", branch], worktree)?;
        Ok(())
    }

    fn switch(worktree: &Path, branch: &str) -> LabResult<()> {
        Self::git_command(&["switch", "--quiet", branch], worktree)?;
        Ok(())
    }

    fn restore_from(worktree: &Path, source: &str) -> LabResult<()> {
        Self::git_command(
            &[
                "restore",
                "--source",
                source,
                "--staged",
                "--worktree",
                "--",
                ".",
            ],
            worktree,
        )?;
        Ok(())
    }

    fn clean(worktree: &Path) -> LabResult<()> {
        Self::git_command(&["clean", "-fdq"], worktree)?;
        Ok(())
    }

    fn add_all(worktree: &Path) -> LabResult<()> {
        Self::git_command(&["add", "-A"], worktree)?;
        Ok(())
    }

    fn commit(worktree: &Path, message: &str) -> LabResult<()> {
        Self::git_command(&["commit", "--quiet", "-m", message], worktree)?;
        Ok(())
    }

    fn merge_no_ff(worktree: &Path, branch: &str, message: &str) -> LabResult<()> {
        Self::git_command(
            &["merge", "--quiet", "--no-ff", "--no-edit", "-m", message, branch],
            worktree,
        )?;
        Ok(())
    }

    fn push(repo_path: &Path, remote: &str, refspec: &str, mode: PushMode<'_>) -> LabResult<()> {
        let lease;
        let mut args = vec!["push", "--quiet"];
        if let PushMode::ForceWithLease { expected } = mode {
            // Lease on the destination branch of the refspec.
            let dst = refspec.rsplit(':').next().unwrap_or(refspec);
            lease = format!("--force-with-lease={dst}:{}", expected.unwrap_or_default());
            args.push(&lease);
        }
        args.extend([remote, refspec]);
        Self::git_command(&args, repo_path)?;
        Ok(())
    }

    fn delete_branch(repo_path: &Path, branch: &str) -> LabResult<()> {
        Self::git_command(&["branch", "--quiet", "-D", branch], repo_path)?;
        Ok(())
    }

    fn reset_branch(repo_path: &Path, branch: &str, target: &str) -> LabResult<()> {
        Self::git_command(&["branch", "--quiet", "-f", branch, target], repo_path)?;
        Ok(())
    }
}

impl GitQuery for ShellBackend {
    fn is_git_repo(path: &Path) -> bool {
        Self::git_command(&["rev-parse", "--is-inside-work-tree"], path).is_ok()
    }

    fn workdir(path: &Path) -> LabResult<PathBuf> {
        Self::git_command(&["rev-parse", "--show-toplevel"], path)
            .map(PathBuf::from)
            .map_err(|_| {
                GitError::RepoNotFound {
                    path: path.display().to_string(),
                }
                .into()
            })
    }

    fn current_branch(path: &Path) -> LabResult<Option<String>> {
        Self::git_command(&["symbolic-ref", "--short", "HEAD"], path)
            .map_or_else(|_| Ok(None), |branch| Ok(Some(branch)))
    }

    fn reference_exists(path: &Path, name: &str) -> LabResult<bool> {
        Self::git_probe(&["show-ref", "--verify", "--quiet", name], path).map(|r| r.is_some())
    }

    fn linked_worktrees(path: &Path) -> LabResult<Vec<PathBuf>> {
        let listing = Self::git_command(&["worktree", "list", "--porcelain"], path)?;
        Ok(listing
            .lines()
            .filter_map(|line| line.strip_prefix("worktree "))
            .skip(1)
            .map(PathBuf::from)
            .collect())
    }
}
