// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::cell::RefCell;
use std::path::Path;
use std::process::Command;

use clap::Parser;

use crate::cli::Cli;
use crate::cli::publish::PublishArgs;
use crate::cmd::clean::run_clean_command;
use crate::cmd::config::build_config_loader;
use crate::cmd::publish::{plan_preview, publish_with};
use crate::config::Config;
use crate::config::types::Strategy;
use crate::error::{LabError, PromptError};
use crate::publish::plan::PublishPlan;
use crate::publish::prompt::Prompter;

/// Declines every confirmation and records the offered defaults.
#[derive(Default)]
struct Decline {
    defaults: RefCell<Vec<bool>>,
}

impl Prompter for Decline {
    fn message(&self) -> Result<String, PromptError> {
        Ok("   ".to_string())
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool, PromptError> {
        self.defaults.borrow_mut().push(default);
        Ok(false)
    }
}

fn prompt_error(err: &anyhow::Error) -> &PromptError {
    match err.downcast_ref::<LabError>() {
        Some(LabError::Prompt(e)) => &**e,
        _ => panic!("expected prompt error, got {err:#}"),
    }
}

#[test]
fn test_config_loader_layers() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path().join("labtohub.toml"),
        "[remotes]\nsource = \"gitlab\"\n\n[publish]\nstrategy = \"squash\"\n",
    )
    .unwrap();
    let extra = temp.path().join("extra.toml");
    std::fs::write(&extra, "[worktree]\nstaging_branch = \"publish-main\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "labtohub",
        "-c",
        extra.to_str().unwrap(),
        "-l",
        "4",
        "-s",
        "merge",
    ])
    .unwrap();
    let loader = build_config_loader(&cli, temp.path()).unwrap();
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.remotes.source, "gitlab");
    assert_eq!(config.worktree.staging_branch, "publish-main");
    assert_eq!(config.publish.strategy, Strategy::Merge);
    assert_eq!(config.global.output_log_level.as_u8(), 4);
}

#[test]
fn test_config_loader_missing_required_file() {
    let temp = tempfile::tempdir().unwrap();
    let cli = Cli::try_parse_from(["labtohub", "-c", "does-not-exist.toml"]).unwrap();
    let loader = build_config_loader(&cli, temp.path()).unwrap();
    assert!(loader.build().is_err());
}

#[test]
fn test_declined_confirmation_aborts_before_git() {
    let temp = tempfile::tempdir().unwrap();
    let args = PublishArgs {
        message: Some("Fix typo".to_string()),
        ..PublishArgs::default()
    };
    let prompter = Decline::default();

    let err = publish_with(&args, &Config::default(), temp.path(), false, &prompter).unwrap_err();
    assert!(matches!(prompt_error(&err), PromptError::Aborted));
    assert_eq!(*prompter.defaults.borrow(), [false]);
}

#[test]
fn test_plan_preview_names_branch_and_message() {
    let plan = PublishPlan::from_config(
        &Config::default(),
        "/repo".into(),
        "Fix typo".to_string(),
        None,
        false,
    );
    insta::assert_snapshot!(plan_preview(&plan), @r#"
    Branch to create: 'fix-typo'
    Merge message: "Fix typo"
    "#);
}

#[test]
fn test_blank_prompted_message_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let err = publish_with(
        &PublishArgs::default(),
        &Config::default(),
        temp.path(),
        false,
        &Decline::default(),
    )
    .unwrap_err();
    assert!(matches!(prompt_error(&err), PromptError::EmptyMessage));
}

fn git(args: &[&str], cwd: &Path) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .status()
        .unwrap();
    assert!(status.success(), "git {} failed", args.join(" "));
}

fn repo_with_commit() -> tempfile::TempDir {
    let temp = tempfile::tempdir().unwrap();
    git(&["init", "-q"], temp.path());
    std::fs::create_dir_all(temp.path().join("src")).unwrap();
    std::fs::write(temp.path().join("src/lib.rs"), "// lib\n").unwrap();
    git(&["add", "-A"], temp.path());
    git(&["commit", "-q", "-m", "init"], temp.path());
    temp
}

#[test]
fn test_clean_removes_leftover_worktree() {
    let temp = repo_with_commit();
    let config = Config::default();
    assert!(!run_clean_command(&config, temp.path()).unwrap());

    let leftover = temp.path().join(".labtohub-tmp");
    git(&["worktree", "add", "-q", "--detach", ".labtohub-tmp"], temp.path());
    std::fs::write(leftover.join("stale.txt"), "stale").unwrap();

    assert!(run_clean_command(&config, temp.path()).unwrap());
    assert!(!leftover.exists());
}

#[test]
fn test_clean_removes_worktree_with_pruned_registration() {
    let temp = repo_with_commit();
    let leftover = temp.path().join(".labtohub-tmp");
    git(&["worktree", "add", "-q", "--detach", ".labtohub-tmp"], temp.path());
    std::fs::remove_dir_all(temp.path().join(".git/worktrees")).unwrap();

    assert!(run_clean_command(&Config::default(), temp.path()).unwrap());
    assert!(!leftover.exists());
}

#[test]
fn test_clean_keeps_directories_that_are_not_worktrees() {
    let temp = repo_with_commit();
    let plain = temp.path().join(".labtohub-tmp");
    std::fs::create_dir_all(&plain).unwrap();
    std::fs::write(plain.join("notes.txt"), "keep me").unwrap();

    let err = run_clean_command(&Config::default(), temp.path()).unwrap_err();
    assert!(format!("{err:#}").contains("is not a git worktree"), "{err:#}");
    assert!(plain.join("notes.txt").exists());

    let mut config = Config::default();
    config.worktree.path = "src".into();
    run_clean_command(&config, temp.path()).unwrap_err();
    assert!(temp.path().join("src/lib.rs").exists());
}
