// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Inputs and results of a publish run.

use bon::Builder;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::config::types::{RemotesConfig, Strategy, WorktreeConfig};

use super::branch::branch_name_from_message;

/// Everything a publish run needs.
#[derive(Debug, Clone, Builder)]
pub struct PublishPlan {
    /// Work tree root of the repository.
    #[builder(into)]
    repo: PathBuf,
    #[builder(default)]
    remotes: RemotesConfig,
    #[builder(default)]
    worktree: WorktreeConfig,
    #[builder(default)]
    strategy: Strategy,
    /// Trimmed, non-empty commit/merge message.
    #[builder(into)]
    message: String,
    /// Content branch name before de-duplication.
    #[builder(into)]
    branch: String,
    #[builder(default)]
    dry_run: bool,
}

impl PublishPlan {
    /// Plan from loaded configuration.
    ///
    /// `strategy` overrides `publish.strategy` when given.
    #[must_use]
    pub fn from_config(
        config: &Config,
        repo: PathBuf,
        message: String,
        strategy: Option<Strategy>,
        dry_run: bool,
    ) -> Self {
        let branch = branch_name_from_message(&message, &config.publish.default_branch);
        Self::builder()
            .repo(repo)
            .remotes(config.remotes.clone())
            .worktree(config.worktree.clone())
            .strategy(strategy.unwrap_or(config.publish.strategy))
            .message(message)
            .branch(branch)
            .dry_run(dry_run)
            .build()
    }

    #[must_use]
    pub fn repo(&self) -> &Path {
        &self.repo
    }

    #[must_use]
    pub const fn remotes(&self) -> &RemotesConfig {
        &self.remotes
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    #[must_use]
    pub fn staging_branch(&self) -> &str {
        &self.worktree.staging_branch
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Absolute location of the temporary worktree.
    #[must_use]
    pub fn worktree_path(&self) -> PathBuf {
        self.repo.join(&self.worktree.path)
    }
}

/// How the target branch relates to the source branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRelation {
    /// Target branch does not exist yet.
    FirstPublish,
    /// Both exist but share no commit.
    Unrelated { target: String },
    /// Both exist with a common ancestor.
    Related { base: String, target: String },
}

impl HistoryRelation {
    /// Whether publishing has to overwrite the target instead of building on it.
    #[must_use]
    pub const fn needs_force(&self) -> bool {
        !matches!(self, Self::Related { .. })
    }

    /// Commit the target branch points to, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::FirstPublish => None,
            Self::Unrelated { target } | Self::Related { target, .. } => Some(target),
        }
    }
}

impl fmt::Display for HistoryRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstPublish => write!(f, "first publish"),
            Self::Unrelated { .. } => write!(f, "unrelated histories"),
            Self::Related { base, .. } => write!(f, "related (merge base {})", short(base)),
        }
    }
}

/// Result of a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Source tree committed and pushed on top of the target.
    Published {
        strategy: Strategy,
        /// Content branch used by the merge strategy.
        branch: Option<String>,
        commit: String,
    },
    /// Source branch pushed over the target.
    ForcePublished {
        relation: HistoryRelation,
        commit: String,
    },
    /// Target already has the source tree.
    NoChanges,
    /// Dry run stopped after classification.
    DryRun { relation: HistoryRelation },
}

impl PublishOutcome {
    /// Human-readable summary line.
    #[must_use]
    pub fn summary(&self, remotes: &RemotesConfig) -> String {
        let source = remotes.source_short();
        let target = remotes.target_short();
        match self {
            Self::Published {
                branch: Some(branch),
                commit,
                ..
            } => format!(
                "Done: {source} copied onto {target} via branch '{branch}' at {} (worktree cleaned).",
                short(commit)
            ),
            Self::Published {
                branch: None,
                commit,
                ..
            } => format!(
                "Done: {source} squashed onto {target} at {} (worktree cleaned).",
                short(commit)
            ),
            Self::ForcePublished { relation, commit } => format!(
                "Done: {target} force-published from {source} at {} ({relation}).",
                short(commit)
            ),
            Self::NoChanges => format!("Done. {target} already matches {source}; nothing to publish."),
            Self::DryRun { relation } => format!("Dry run: {relation}; nothing was changed."),
        }
    }
}

/// Abbreviated commit id for messages.
fn short(id: &str) -> &str {
    id.get(..10).unwrap_or(id)
}
