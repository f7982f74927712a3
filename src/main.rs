// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Publish | Clean | Options | Version
//! ```

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use labtohub::cli::{self, Cli, Command};
use labtohub::cmd::clean::run_clean_command;
use labtohub::cmd::config::{build_config_loader, resolve_repo, run_options_command};
use labtohub::cmd::publish::run_publish_command;
use labtohub::config::Config;
use labtohub::error::Result;
use labtohub::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    match dispatch_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch_command(cli: &Cli) -> Result<()> {
    if let Some(Command::Version) = cli.command {
        handle_version_command();
        return Ok(());
    }

    let repo = resolve_repo(&cli.global.repo)?;
    let loader = build_config_loader(cli, &repo)?;
    let loaded_files = loader.format_loaded_files();
    let config = loader.build().context("loading configuration")?;

    let _log_guard = init_logging(&build_log_config(&config))?;
    tracing::debug!(repo = %repo.display(), "resolved repository");

    match &cli.command {
        Some(Command::Options) => {
            run_options_command(&config, &loaded_files);
            Ok(())
        }
        Some(Command::Clean) => run_clean_command(&config, &repo).map(|_| ()),
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        None => run_publish_command(&cli.publish, &config, &repo, cli.global.dry),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(config.log_file().map(Path::to_path_buf))
        .build()
}
