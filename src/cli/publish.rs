// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options of the default publish command.

use clap::Args;

use crate::config::types::Strategy;

#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Commit and merge message; prompted for when omitted.
    #[arg(short = 'm', long = "message", value_name = "MSG")]
    pub message: Option<String>,

    /// How the source tree lands on the target (default from config: merge).
    #[arg(short = 's', long = "strategy", value_enum, value_name = "STRATEGY")]
    pub strategy: Option<Strategy>,

    /// Answers every confirmation with yes.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

impl PublishArgs {
    /// `(key, value)` configuration overrides from publish flags.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, String)> {
        self.strategy
            .map(|strategy| vec![("publish.strategy", strategy.to_string())])
            .unwrap_or_default()
    }
}
