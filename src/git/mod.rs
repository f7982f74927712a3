// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!         Public API
//!      query.rs   cmd.rs
//!          \        /
//!           v      v
//!      ,------------------,
//!      | backend (traits) |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GitQuery    GitMutation
//!   (gix, read)  (CLI, write)
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!    .workdir    .fetch / .push
//!    .branch     .worktree_*
//!    .ref exists .commit / .merge
//!                probes: merge-base,
//!                diff --quiet, rev-parse
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for every write and for exit-code probes.

pub mod backend;
pub mod cmd;
pub mod query;

#[cfg(test)]
mod tests;
