// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{GitError, LabError};
use crate::git::backend::PushMode;
use crate::git::cmd::{commit_all, overlay_tree, push};
use crate::git::query::{local_branch_exists, remote_names};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn git(args: &[&str], cwd: &Path) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {} failed", args.join(" "));
}

fn init_repo(dir: &Path) {
    git(&["init", "-q"], dir);
    git(&["symbolic-ref", "HEAD", "refs/heads/main"], dir);
    git(&["config", "user.email", "test@test.com"], dir);
    git(&["config", "user.name", "Test"], dir);
}

#[test]
fn test_push_to_protected_remote_is_refused() {
    // The path does not even exist: git must never run.
    let err = push(
        Path::new("/nonexistent/labtohub"),
        "origin",
        "labtohub-main:main",
        PushMode::FastForward,
        "origin",
    )
    .unwrap_err();
    let LabError::Git(git_err) = err else {
        panic!("expected git error");
    };
    assert!(matches!(*git_err, GitError::ProtectedRemote { ref remote } if remote == "origin"));
}

#[test]
fn test_commit_all_skips_empty_commit() {
    let temp = temp_dir();
    init_repo(temp.path());
    std::fs::write(temp.path().join("a.txt"), "a\n").unwrap();

    assert!(commit_all(temp.path(), "Add a").unwrap());
    assert!(!commit_all(temp.path(), "Nothing").unwrap());
    assert!(local_branch_exists(temp.path(), "main").unwrap());
}

#[test]
fn test_overlay_tree_replaces_content() {
    let temp = temp_dir();
    init_repo(temp.path());
    std::fs::write(temp.path().join("keep.txt"), "v1\n").unwrap();
    std::fs::write(temp.path().join("gone.txt"), "bye\n").unwrap();
    commit_all(temp.path(), "v1").unwrap();
    git(&["branch", "v1"], temp.path());

    std::fs::remove_file(temp.path().join("gone.txt")).unwrap();
    std::fs::write(temp.path().join("keep.txt"), "v2\n").unwrap();
    std::fs::write(temp.path().join("added.txt"), "new\n").unwrap();
    commit_all(temp.path(), "v2").unwrap();

    // Back to v1 content, plus an untracked stray file that must disappear.
    git(&["switch", "-q", "v1"], temp.path());
    std::fs::write(temp.path().join("stray.txt"), "stray\n").unwrap();
    overlay_tree(temp.path(), "main").unwrap();

    assert_eq!(
        std::fs::read_to_string(temp.path().join("keep.txt")).unwrap(),
        "v2\n"
    );
    assert!(temp.path().join("added.txt").exists());
    assert!(!temp.path().join("gone.txt").exists());
    assert!(!temp.path().join("stray.txt").exists());
}

#[test]
fn test_remote_names() {
    let temp = temp_dir();
    init_repo(temp.path());
    git(&["remote", "add", "origin", "https://gitlab.example/x.git"], temp.path());
    git(&["remote", "add", "github", "https://github.example/x.git"], temp.path());

    let mut names = remote_names(temp.path()).unwrap();
    names.sort();
    assert_eq!(names, ["github", "origin"]);
}
