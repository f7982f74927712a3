// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish pipeline: copy `origin/main` onto `github/main`.
//!
//! ```text
//! preflight         git on PATH, both remotes configured
//! leftover cleanup  stale .labtohub-tmp from an interrupted run
//! fetch             target (prune), then source
//! classify          FirstPublish | Unrelated | Related
//!    |
//!    +-- FirstPublish / Unrelated
//!    |      push --force-with-lease <source ref>:refs/heads/<branch>
//!    |
//!    +-- Related
//!           same tree?          -> NoChanges
//!           staging diverged?   -> prompt reset / abort
//!           WorktreeGuard at <target>
//!             merge:  switch -C <content>, overlay, commit,
//!                     switch <staging>, merge --no-ff <content>
//!             squash: overlay, commit on <staging>
//!           push <staging>:<branch>
//! ```
//!
//! The source remote is never a push destination.

pub mod branch;
pub mod plan;
pub mod prompt;
pub mod worktree;

#[cfg(test)]
mod tests;

use anyhow::Context;
use tracing::{info, info_span, warn};

use crate::config::types::Strategy;
use crate::error::{GitError, LabError, ProcessError, PromptError, Result};
use crate::git::backend::PushMode;
use crate::git::{cmd, query};

use branch::unique_branch_name;
use plan::{HistoryRelation, PublishOutcome, PublishPlan};
use prompt::Prompter;
use worktree::{WorktreeGuard, remove_worktree};

/// Run the whole pipeline.
///
/// # Errors
///
/// Returns the first failing step; nothing after it runs.
pub fn run(plan: &PublishPlan, prompter: &impl Prompter) -> Result<PublishOutcome> {
    let _span = info_span!("publish", strategy = %plan.strategy()).entered();

    preflight(plan)?;
    if !plan.is_dry_run() {
        remove_leftover_worktree(plan)?;
    }
    fetch_remotes(plan)?;

    let relation = classify(plan)?;
    info!(%relation, "classified history");

    if plan.is_dry_run() {
        return Ok(PublishOutcome::DryRun { relation });
    }

    if relation.needs_force() {
        force_publish(plan, relation, prompter)
    } else {
        publish_related(plan, prompter)
    }
}

/// Check the environment before anything is touched.
///
/// # Errors
///
/// Returns `ProcessError::ExecutableNotFound` without git,
/// `GitError::RepoNotFound` outside a repository, or
/// `GitError::RemoteNotFound` for a missing remote.
pub fn preflight(plan: &PublishPlan) -> Result<()> {
    which::which("git").map_err(|_| {
        LabError::from(ProcessError::ExecutableNotFound {
            name: "git".to_string(),
        })
    })?;

    if !query::is_git_repo(plan.repo()) {
        return Err(LabError::from(GitError::RepoNotFound {
            path: plan.repo().display().to_string(),
        })
        .into());
    }

    let configured = query::remote_names(plan.repo()).context("listing remotes")?;
    let remotes = plan.remotes();
    for remote in [&remotes.source, &remotes.target] {
        if !configured.iter().any(|name| name == remote) {
            return Err(LabError::from(GitError::RemoteNotFound {
                remote: remote.clone(),
            })
            .into());
        }
    }
    Ok(())
}

/// Remove a worktree left behind by an interrupted run.
///
/// Returns `true` if one was found.
///
/// # Errors
///
/// Returns an error if the worktree path holds a directory that is not a
/// worktree of the repository, or if it cannot be deleted.
pub fn remove_leftover_worktree(plan: &PublishPlan) -> Result<bool> {
    let path = plan.worktree_path();
    let removed = remove_worktree(plan.repo(), &path)
        .with_context(|| format!("removing leftover worktree {}", path.display()))?;
    if removed {
        warn!(path = %path.display(), "removed leftover temporary worktree");
    }
    Ok(removed)
}

/// Fetch the target remote, then the source remote.
///
/// The target may be empty (first publish); the source branch must exist.
///
/// # Errors
///
/// Returns an error if a fetch fails or the source branch is missing.
pub fn fetch_remotes(plan: &PublishPlan) -> Result<()> {
    let remotes = plan.remotes();

    info!(remote = %remotes.target, "fetching");
    cmd::fetch(plan.repo(), &remotes.target, true)
        .with_context(|| format!("fetching {}", remotes.target))?;

    info!(remote = %remotes.source, "fetching");
    cmd::fetch(plan.repo(), &remotes.source, true)
        .with_context(|| format!("fetching {}", remotes.source))?;

    if !query::reference_exists(plan.repo(), &remotes.source_ref())? {
        return Err(LabError::from(GitError::BranchNotFound {
            branch: remotes.source_short(),
        })
        .into());
    }
    Ok(())
}

/// Work out how target and source histories relate.
///
/// # Errors
///
/// Returns an error if refs cannot be resolved.
pub fn classify(plan: &PublishPlan) -> Result<HistoryRelation> {
    let remotes = plan.remotes();
    let source_ref = remotes.source_ref();
    let target_ref = remotes.target_ref();

    let Some(target) = query::rev_parse(plan.repo(), &target_ref)? else {
        return Ok(HistoryRelation::FirstPublish);
    };

    let relation = match query::merge_base(plan.repo(), &source_ref, &target_ref)? {
        Some(base) => HistoryRelation::Related { base, target },
        None => HistoryRelation::Unrelated { target },
    };
    Ok(relation)
}

/// Overwrite the target branch with the source branch.
///
/// Unrelated histories are only overwritten after confirmation; the lease
/// makes the push fail if the target moved since the fetch.
///
/// # Errors
///
/// Returns `PromptError::Aborted` if the overwrite is declined, or the push error.
pub fn force_publish(
    plan: &PublishPlan,
    relation: HistoryRelation,
    prompter: &impl Prompter,
) -> Result<PublishOutcome> {
    let remotes = plan.remotes();

    if let HistoryRelation::Unrelated { .. } = relation {
        let question = format!(
            "{} shares no history with {}. Overwrite it?",
            remotes.target_short(),
            remotes.source_short()
        );
        if !prompter.confirm(&question, false).map_err(LabError::from)? {
            return Err(LabError::from(PromptError::Aborted).into());
        }
    }

    let commit = query::rev_parse(plan.repo(), &remotes.source_ref())?.ok_or_else(|| {
        LabError::from(GitError::BranchNotFound {
            branch: remotes.source_short(),
        })
    })?;

    info!(%relation, commit = %commit, "force-publishing");
    let refspec = format!("{}:refs/heads/{}", remotes.source_ref(), remotes.branch);
    cmd::push(
        plan.repo(),
        &remotes.target,
        &refspec,
        PushMode::ForceWithLease {
            expected: relation.target(),
        },
        &remotes.source,
    )
    .with_context(|| format!("force-pushing {}", remotes.target_short()))?;

    // Keep the staging branch in line with what was just published.
    if query::local_branch_exists(plan.repo(), plan.staging_branch())?
        && let Err(e) = cmd::reset_branch(plan.repo(), plan.staging_branch(), &commit)
    {
        warn!(branch = plan.staging_branch(), "could not reset staging branch: {e}");
    }

    Ok(PublishOutcome::ForcePublished { relation, commit })
}

/// Make sure a leftover staging branch holds nothing unpublished.
///
/// A staging branch that is not an ancestor of the target (for example after
/// a rejected push) is reset to the target on confirmation.
///
/// # Errors
///
/// Returns `GitError::DivergedHistory` if the reset is declined.
pub fn check_staging_divergence(plan: &PublishPlan, prompter: &impl Prompter) -> Result<()> {
    let staging = plan.staging_branch();
    if !query::local_branch_exists(plan.repo(), staging)? {
        return Ok(());
    }

    let target_ref = plan.remotes().target_ref();
    let local_ref = format!("refs/heads/{staging}");
    if query::is_ancestor(plan.repo(), &local_ref, &target_ref)? {
        return Ok(());
    }

    let target_short = plan.remotes().target_short();
    let question = format!("Local '{staging}' has diverged from {target_short}. Reset it?");
    if !prompter.confirm(&question, false).map_err(LabError::from)? {
        return Err(LabError::from(GitError::DivergedHistory {
            branch: staging.to_string(),
            upstream: target_short,
        })
        .into());
    }

    info!(branch = staging, upstream = %target_short, "resetting diverged staging branch");
    cmd::reset_branch(plan.repo(), staging, &target_ref)
        .with_context(|| format!("resetting {staging}"))?;
    Ok(())
}

fn publish_related(plan: &PublishPlan, prompter: &impl Prompter) -> Result<PublishOutcome> {
    let remotes = plan.remotes();
    let source_ref = remotes.source_ref();
    let target_ref = remotes.target_ref();

    if query::tree_id(plan.repo(), &source_ref)? == query::tree_id(plan.repo(), &target_ref)? {
        info!("{} already matches {}", remotes.target_short(), remotes.source_short());
        return Ok(PublishOutcome::NoChanges);
    }

    check_staging_divergence(plan, prompter)?;

    let mut guard = WorktreeGuard::create(
        plan.repo(),
        plan.worktree_path(),
        plan.staging_branch(),
        &target_ref,
    )
    .context("adding temporary worktree")?;

    let outcome = match plan.strategy() {
        Strategy::Merge => publish_merge(plan, &mut guard)?,
        Strategy::Squash => publish_squash(plan, &guard)?,
    };

    if let PublishOutcome::Published { .. } = outcome {
        push_staging(plan)?;
    }
    Ok(outcome)
}

/// Commit the source tree on a content branch and merge it into staging.
///
/// # Errors
///
/// Returns the failing git step.
pub fn publish_merge(plan: &PublishPlan, guard: &mut WorktreeGuard) -> Result<PublishOutcome> {
    let remotes = plan.remotes();
    let worktree = guard.path().to_path_buf();

    let branch = unique_branch_name(
        plan.repo(),
        plan.branch(),
        &[plan.staging_branch(), remotes.branch.as_str()],
    )?;

    info!(branch = %branch, "creating content branch");
    cmd::switch_create(&worktree, &branch).with_context(|| format!("creating branch {branch}"))?;
    guard.track_branch(branch.clone());

    info!("overwriting worktree with {} contents", remotes.source_short());
    cmd::overlay_tree(&worktree, &remotes.source_ref())
        .with_context(|| format!("copying {} into the worktree", remotes.source_short()))?;

    if !cmd::commit_all(&worktree, plan.message()).context("committing content")? {
        info!("no differences between {} and {}", remotes.target_short(), remotes.source_short());
        return Ok(PublishOutcome::NoChanges);
    }

    info!(branch = %branch, staging = plan.staging_branch(), "merging");
    cmd::switch(&worktree, plan.staging_branch())
        .with_context(|| format!("switching to {}", plan.staging_branch()))?;
    cmd::merge_no_ff(&worktree, &branch, plan.message())
        .with_context(|| format!("merging {branch}"))?;

    let commit = staging_head(plan)?;
    Ok(PublishOutcome::Published {
        strategy: Strategy::Merge,
        branch: Some(branch),
        commit,
    })
}

/// Commit the source tree as one squash commit on staging.
///
/// # Errors
///
/// Returns the failing git step.
pub fn publish_squash(plan: &PublishPlan, guard: &WorktreeGuard) -> Result<PublishOutcome> {
    let remotes = plan.remotes();

    info!("squashing {} contents", remotes.source_short());
    cmd::overlay_tree(guard.path(), &remotes.source_ref())
        .with_context(|| format!("copying {} into the worktree", remotes.source_short()))?;

    if !cmd::commit_all(guard.path(), plan.message()).context("committing squash")? {
        return Ok(PublishOutcome::NoChanges);
    }

    let commit = staging_head(plan)?;
    Ok(PublishOutcome::Published {
        strategy: Strategy::Squash,
        branch: None,
        commit,
    })
}

fn push_staging(plan: &PublishPlan) -> Result<()> {
    let remotes = plan.remotes();
    info!("pushing {} to {}", plan.staging_branch(), remotes.target_short());
    let refspec = format!(
        "refs/heads/{}:refs/heads/{}",
        plan.staging_branch(),
        remotes.branch
    );
    cmd::push(
        plan.repo(),
        &remotes.target,
        &refspec,
        PushMode::FastForward,
        &remotes.source,
    )
    .with_context(|| format!("pushing to {}", remotes.target_short()))?;
    Ok(())
}

fn staging_head(plan: &PublishPlan) -> Result<String> {
    let staging_ref = format!("refs/heads/{}", plan.staging_branch());
    query::rev_parse(plan.repo(), &staging_ref)?.ok_or_else(|| {
        LabError::from(GitError::BranchNotFound {
            branch: plan.staging_branch().to_string(),
        })
        .into()
    })
}
