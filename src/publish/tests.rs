// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::branch::{branch_name_from_message, unique_branch_name};
use super::plan::{HistoryRelation, PublishOutcome, PublishPlan};
use super::prompt::{AssumeYes, Prompter, normalize_message, resolve_message};
use super::{check_staging_divergence, classify, fetch_remotes, preflight};
use crate::config::Config;
use crate::config::types::{RemotesConfig, Strategy};
use crate::error::{GitError, LabError, PromptError};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Prompter answering from a fixed script.
struct Scripted {
    message: &'static str,
    answers: RefCell<Vec<bool>>,
}

impl Scripted {
    fn new(message: &'static str, answers: &[bool]) -> Self {
        let mut answers = answers.to_vec();
        answers.reverse();
        Self {
            message,
            answers: RefCell::new(answers),
        }
    }
}

impl Prompter for Scripted {
    fn message(&self) -> Result<String, PromptError> {
        Ok(self.message.to_string())
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool, PromptError> {
        Ok(self.answers.borrow_mut().pop().unwrap_or(default))
    }
}

fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    git(&["init", "-q"], dir);
    git(&["symbolic-ref", "HEAD", "refs/heads/main"], dir);
    git(&["config", "user.email", "test@test.com"], dir);
    git(&["config", "user.name", "Test"], dir);
}

fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(dir.join(name), content).unwrap();
    git(&["add", "-A"], dir);
    git(&["commit", "-q", "-m", message], dir);
}

/// Work repository with `origin` and `github` pointing at local bare repos.
struct Fixture {
    _temp: TempDir,
    work: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let gitlab = temp.path().join("gitlab.git");
        let github = temp.path().join("github.git");
        let upstream = temp.path().join("upstream");
        let work = temp.path().join("work");
        for bare in [&gitlab, &github] {
            std::fs::create_dir_all(bare).unwrap();
            git(&["init", "-q", "--bare"], bare);
        }

        init_repo(&upstream);
        git(&["remote", "add", "origin", gitlab.to_str().unwrap()], &upstream);
        commit_file(&upstream, "README.md", "# Project\n", "Initial commit");
        git(&["push", "-q", "origin", "main"], &upstream);

        init_repo(&work);
        git(&["remote", "add", "origin", gitlab.to_str().unwrap()], &work);
        git(&["remote", "add", "github", github.to_str().unwrap()], &work);

        Self { _temp: temp, work }
    }

    fn plan(&self, message: &str) -> PublishPlan {
        PublishPlan::from_config(
            &Config::default(),
            self.work.clone(),
            message.to_string(),
            None,
            false,
        )
    }
}

fn lab_error(err: &anyhow::Error) -> &LabError {
    err.downcast_ref::<LabError>()
        .unwrap_or_else(|| panic!("expected LabError, got {err:#}"))
}

#[test]
fn test_branch_name_from_message() {
    let cases = [
        ("Fix typo", "fix-typo"),
        ("  Fix   typo!!  ", "fix-typo"),
        ("Release v1.2.3", "release-v1-2-3"),
        ("--already--dashed--", "already-dashed"),
        ("Ünïcode wörds", "n-code-w-rds"),
        ("!!!", "new"),
        ("", "new"),
    ];
    for (message, expected) in cases {
        assert_eq!(branch_name_from_message(message, "new"), expected, "{message:?}");
    }
}

#[test]
fn test_branch_name_custom_fallback() {
    assert_eq!(branch_name_from_message("???", "publish"), "publish");
}

#[test]
fn test_unique_branch_name_skips_taken_and_reserved() {
    let temp = tempfile::tempdir().unwrap();
    init_repo(temp.path());
    commit_file(temp.path(), "a.txt", "a\n", "a");
    git(&["branch", "fix-typo"], temp.path());

    assert_eq!(
        unique_branch_name(temp.path(), "fix-typo", &[]).unwrap(),
        "fix-typo-2"
    );
    assert_eq!(
        unique_branch_name(temp.path(), "labtohub-main", &["labtohub-main"]).unwrap(),
        "labtohub-main-2"
    );
    assert_eq!(
        unique_branch_name(temp.path(), "fresh", &["main"]).unwrap(),
        "fresh"
    );
}

#[test]
fn test_message_resolution() {
    let prompter = Scripted::new("  From prompt  ", &[]);
    assert_eq!(resolve_message(Some(" Given "), &prompter).unwrap(), "Given");
    assert_eq!(resolve_message(None, &prompter).unwrap(), "From prompt");
    assert_eq!(resolve_message(Some("   "), &prompter).unwrap(), "From prompt");
    assert!(matches!(
        normalize_message(" \t "),
        Err(PromptError::EmptyMessage)
    ));
}

#[test]
fn test_assume_yes_overrides_answers() {
    let prompter = AssumeYes(Scripted::new("m", &[false]));
    assert!(prompter.confirm("Proceed?", false).unwrap());
    assert_eq!(prompter.message().unwrap(), "m");
}

#[test]
fn test_plan_from_config() {
    let mut config = Config::default();
    config.publish.strategy = Strategy::Squash;
    let plan = PublishPlan::from_config(
        &config,
        PathBuf::from("/repo"),
        "Fix typo".to_string(),
        Some(Strategy::Merge),
        true,
    );
    assert_eq!(plan.branch(), "fix-typo");
    assert_eq!(plan.strategy(), Strategy::Merge);
    assert_eq!(plan.staging_branch(), "labtohub-main");
    assert_eq!(plan.worktree_path(), Path::new("/repo").join(".labtohub-tmp"));
    assert!(plan.is_dry_run());
}

#[test]
fn test_outcome_summaries() {
    let remotes = RemotesConfig::default();
    let published = PublishOutcome::Published {
        strategy: Strategy::Merge,
        branch: Some("fix-typo".to_string()),
        commit: "0123456789abcdef".to_string(),
    };
    insta::assert_snapshot!(
        published.summary(&remotes),
        @"Done: origin/main copied onto github/main via branch 'fix-typo' at 0123456789 (worktree cleaned)."
    );
    insta::assert_snapshot!(
        PublishOutcome::NoChanges.summary(&remotes),
        @"Done. github/main already matches origin/main; nothing to publish."
    );
    let forced = PublishOutcome::ForcePublished {
        relation: HistoryRelation::FirstPublish,
        commit: "abc".to_string(),
    };
    insta::assert_snapshot!(
        forced.summary(&remotes),
        @"Done: github/main force-published from origin/main at abc (first publish)."
    );
}

#[test]
fn test_history_relation_helpers() {
    assert!(HistoryRelation::FirstPublish.needs_force());
    assert_eq!(HistoryRelation::FirstPublish.target(), None);
    let unrelated = HistoryRelation::Unrelated {
        target: "t".to_string(),
    };
    assert!(unrelated.needs_force());
    assert_eq!(unrelated.target(), Some("t"));
    let related = HistoryRelation::Related {
        base: "b".to_string(),
        target: "t".to_string(),
    };
    assert!(!related.needs_force());
}

#[test]
fn test_preflight_reports_missing_remote() {
    let fixture = Fixture::new();
    git(&["remote", "remove", "github"], &fixture.work);

    let err = preflight(&fixture.plan("x")).unwrap_err();
    let LabError::Git(git_err) = lab_error(&err) else {
        panic!("expected git error, got {err:#}");
    };
    assert!(matches!(**git_err, GitError::RemoteNotFound { ref remote } if remote == "github"));
}

#[test]
fn test_classify_first_publish_then_related() {
    let fixture = Fixture::new();
    let plan = fixture.plan("x");

    fetch_remotes(&plan).unwrap();
    assert_eq!(classify(&plan).unwrap(), HistoryRelation::FirstPublish);

    git(&["push", "-q", "github", "refs/remotes/origin/main:refs/heads/main"], &fixture.work);
    fetch_remotes(&plan).unwrap();
    assert!(matches!(
        classify(&plan).unwrap(),
        HistoryRelation::Related { .. }
    ));
}

#[test]
fn test_classify_unrelated() {
    let fixture = Fixture::new();
    let other = fixture.work.parent().unwrap().join("other");
    init_repo(&other);
    commit_file(&other, "OTHER.md", "other\n", "Unrelated root");
    let github = fixture.work.parent().unwrap().join("github.git");
    git(&["push", "-q", github.to_str().unwrap(), "main"], &other);

    let plan = fixture.plan("x");
    fetch_remotes(&plan).unwrap();
    assert!(matches!(
        classify(&plan).unwrap(),
        HistoryRelation::Unrelated { .. }
    ));
}

#[test]
fn test_fetch_requires_source_branch() {
    let fixture = Fixture::new();
    let mut config = Config::default();
    config.remotes.branch = "release".to_string();
    let plan = PublishPlan::from_config(&config, fixture.work.clone(), "x".to_string(), None, false);

    let err = fetch_remotes(&plan).unwrap_err();
    let LabError::Git(git_err) = lab_error(&err) else {
        panic!("expected git error, got {err:#}");
    };
    assert!(matches!(**git_err, GitError::BranchNotFound { ref branch } if branch == "origin/release"));
}

#[test]
fn test_staging_divergence_prompt() {
    let fixture = Fixture::new();
    let plan = fixture.plan("x");
    git(&["push", "-q", "github", "refs/remotes/origin/main:refs/heads/main"], &fixture.work);
    fetch_remotes(&plan).unwrap();

    // No staging branch yet: nothing to ask.
    check_staging_divergence(&plan, &Scripted::new("x", &[false])).unwrap();

    // Staging branch with an unpublished commit.
    git(&["switch", "-q", "-c", "labtohub-main", "github/main"], &fixture.work);
    commit_file(&fixture.work, "local.txt", "local\n", "Unpublished");
    git(&["switch", "-q", "--detach"], &fixture.work);

    let err = check_staging_divergence(&plan, &Scripted::new("x", &[false])).unwrap_err();
    let LabError::Git(git_err) = lab_error(&err) else {
        panic!("expected git error, got {err:#}");
    };
    assert!(matches!(**git_err, GitError::DivergedHistory { .. }));

    check_staging_divergence(&plan, &Scripted::new("x", &[true])).unwrap();
    assert_eq!(
        git(&["rev-parse", "labtohub-main"], &fixture.work),
        git(&["rev-parse", "github/main"], &fixture.work)
    );
}
