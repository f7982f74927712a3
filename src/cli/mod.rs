// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for labtohub using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! labtohub [global options] [publish options] [command]
//!   (none)    publish origin/main onto github/main
//!   clean     remove a leftover temporary worktree
//!   options   print the resolved configuration
//!   version
//! ```

pub mod global;
pub mod publish;


use crate::cli::global::GlobalOptions;
use crate::cli::publish::PublishArgs;
use clap::{Parser, Subcommand};

/// GitLab to GitHub publishing tool
///
/// Copies the tree of the source branch onto the target branch through a
/// temporary worktree, leaving the current checkout untouched.
#[derive(Debug, Parser)]
#[command(
    name = "labtohub",
    author,
    version,
    about = "Publish a GitLab branch to GitHub",
    long_about = "labtohub Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Publishes the contents of origin/main onto github/main. The\n\
                  work happens in a temporary worktree, so the current checkout\n\
                  is never modified. Nothing is ever pushed to origin.",
    after_help = "CONFIGURATION:\n\n\
                  labtohub reads `labtohub.toml` from the repository root if it\n\
                  exists, then every file given with --config, then LABTOHUB_*\n\
                  environment variables (for example LABTOHUB_REMOTES__SOURCE=gitlab).\n\
                  Command-line flags override all of them."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Options for the default publish command
    #[command(flatten)]
    pub publish: PublishArgs,

    /// Command to execute; publishes when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Removes a temporary worktree left by an interrupted run.
    Clean,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
