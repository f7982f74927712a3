// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use labtohub::config::Config;
use labtohub::config::types::Strategy;
use labtohub::logging::LogLevel;
use std::path::PathBuf;

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_empty_uses_defaults() {
    let config = Config::parse("").unwrap();
    let lines = config.format_options();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "global.file_log_level   = 5");
    assert_eq!(lines[2], "global.output_log_level = 3");
    assert!(lines.contains(&"worktree.path           = .labtohub-tmp".to_string()));
    assert!(lines.contains(&"worktree.staging_branch = labtohub-main".to_string()));
    assert!(lines.contains(&"publish.default_branch  = new".to_string()));
}

#[test]
fn config_parse_full_file() {
    let toml = r#"
[global]
output_log_level = 2
file_log_level = 6
log_file = "labtohub.log"

[remotes]
source = "gitlab"
target = "mirror"
branch = "trunk"

[worktree]
path = "build/publish"
staging_branch = "publish-trunk"

[publish]
strategy = "squash"
confirm = false
default_branch = "update"
"#;
    let config = Config::parse(toml).unwrap();
    assert_eq!(config.global.output_log_level, LogLevel::Warn);
    assert_eq!(config.global.file_log_level, LogLevel::Dump);
    assert_eq!(config.remotes.source_ref(), "refs/remotes/gitlab/trunk");
    assert_eq!(config.remotes.target_ref(), "refs/remotes/mirror/trunk");
    assert_eq!(config.worktree.path, PathBuf::from("build/publish"));
    assert_eq!(config.worktree.staging_branch, "publish-trunk");
    assert_eq!(config.publish.strategy, Strategy::Squash);
    assert!(!config.publish.confirm);
    assert_eq!(config.publish.default_branch, "update");
}

#[test]
fn config_invalid_strategy_rejected() {
    assert!(Config::parse("[publish]\nstrategy = \"rebase\"\n").is_err());
}

#[test]
fn config_invalid_log_level_rejected() {
    assert!(Config::parse("[global]\noutput_log_level = 9\n").is_err());
}

#[test]
fn config_unknown_section_rejected() {
    assert!(Config::parse("[mirror]\nurl = \"x\"\n").is_err());
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_builder_layered() {
    let temp = tempfile::tempdir().unwrap();
    let base = temp.path().join("labtohub.toml");
    let extra = temp.path().join("ci.toml");
    std::fs::write(&base, "[remotes]\nsource = \"gitlab\"\ntarget = \"gh\"\n").unwrap();
    std::fs::write(&extra, "[remotes]\ntarget = \"github-ci\"\n\n[publish]\nconfirm = false\n")
        .unwrap();

    let config = Config::builder()
        .add_toml_file_optional(&base)
        .add_toml_file(&extra)
        .build()
        .unwrap();

    assert_eq!(config.remotes.source, "gitlab");
    assert_eq!(config.remotes.target, "github-ci");
    assert!(!config.publish.confirm);
}

#[test]
fn config_builder_set_override() {
    let config = Config::builder()
        .add_toml_str("[remotes]\nbranch = \"develop\"\n")
        .set("remotes.branch", "release")
        .unwrap()
        .set("global.output_log_level", "1")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.remotes.branch, "release");
    assert_eq!(config.global.output_log_level, LogLevel::Error);
}

#[test]
fn config_from_missing_file_fails() {
    let temp = tempfile::tempdir().unwrap();
    assert!(Config::from_file(temp.path().join("absent.toml")).is_err());
}

#[test]
fn config_override_breaking_validation_fails() {
    let result = Config::builder()
        .set("remotes.target", "origin")
        .unwrap()
        .build();
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("target must differ from source"));
}
