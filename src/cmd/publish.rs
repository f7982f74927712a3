// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Default command: publish the source branch onto the target.

use std::path::Path;
use tracing::debug;

use crate::cli::publish::PublishArgs;
use crate::config::Config;
use crate::error::{LabError, PromptError, Result};
use crate::git::query;
use crate::publish::plan::{PublishOutcome, PublishPlan};
use crate::publish::prompt::{AssumeYes, Prompter, TerminalPrompter, resolve_message};
use crate::publish::run;

/// Message used for dry runs started without `--message`.
const DRY_RUN_MESSAGE: &str = "dry run";

/// Run the publish command and print its summary.
///
/// # Errors
///
/// Returns an error if prompting fails, the user declines, or any git step fails.
pub fn run_publish_command(
    args: &PublishArgs,
    config: &Config,
    repo: &Path,
    dry_run: bool,
) -> Result<()> {
    let outcome = if args.yes {
        publish_with(args, config, repo, dry_run, &AssumeYes(TerminalPrompter))?
    } else {
        publish_with(args, config, repo, dry_run, &TerminalPrompter)?
    };
    println!("{}", outcome.summary(&config.remotes));
    Ok(())
}

/// Resolve the message, confirm, and run the pipeline with `prompter`.
///
/// # Errors
///
/// Returns `PromptError::Aborted` if the confirmation is declined, or the
/// first failing pipeline step.
pub fn publish_with(
    args: &PublishArgs,
    config: &Config,
    repo: &Path,
    dry_run: bool,
    prompter: &impl Prompter,
) -> Result<PublishOutcome> {
    let message = match args.message.as_deref() {
        None if dry_run => DRY_RUN_MESSAGE.to_string(),
        given => resolve_message(given, prompter).map_err(LabError::from)?,
    };

    let plan = PublishPlan::from_config(config, repo.to_path_buf(), message, args.strategy, dry_run);
    debug!(?plan, "publish plan");
    if let Some(branch) = query::current_branch(repo).ok().flatten() {
        debug!(branch, "current checkout stays on its branch");
    }

    if config.publish.confirm && !dry_run {
        println!("{}", plan_preview(&plan));
        let question = format!(
            "Publish {} onto {}? Uses a temporary worktree; your current files stay untouched.",
            config.remotes.source_short(),
            config.remotes.target_short()
        );
        if !prompter.confirm(&question, false).map_err(LabError::from)? {
            return Err(LabError::from(PromptError::Aborted).into());
        }
    }

    run(&plan, prompter)
}

/// Branch and message shown before asking to proceed.
#[must_use]
pub fn plan_preview(plan: &PublishPlan) -> String {
    format!(
        "Branch to create: '{}'\nMerge message: \"{}\"",
        plan.branch(),
        plan.message()
    )
}
