// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging through `tracing`.
//!
//! ```text
//! init_logging(&LogConfig)
//!   stderr layer   level filter, ANSI, no timestamps
//!   file layer     level filter, plain text, non_blocking (optional)
//!        |
//!   LogGuard       flushes the file writer on drop
//! ```
//!
//! Pipeline steps log at INFO, every git invocation at DEBUG. Below
//! [`LogLevel::Dump`] only events from this crate pass, so gix stays quiet.

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::error::{ConfigError, Result};

/// Verbosity, configured as a number from 0 (silent) to 6 (dump).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    /// Also shows each git command.
    Debug,
    Trace,
    /// Trace output from dependencies too.
    Dump,
}

impl LogLevel {
    const ALL: [Self; 7] = [
        Self::Silent,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
        Self::Dump,
    ];

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// `EnvFilter` directive for this level.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Silent => "off",
            Self::Error => "labtohub=error",
            Self::Warn => "labtohub=warn",
            Self::Info => "labtohub=info",
            Self::Debug => "labtohub=debug",
            Self::Trace => "labtohub=trace",
            Self::Dump => "trace",
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ConfigError;

    fn try_from(level: u8) -> std::result::Result<Self, ConfigError> {
        Self::ALL
            .get(usize::from(level))
            .copied()
            .ok_or_else(|| ConfigError::InvalidValue {
                section: "global".to_string(),
                key: "log_level".to_string(),
                message: format!("log level must be 0-6, got {level}"),
            })
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.as_u8()
    }
}

/// Where log output goes and how much of it.
#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default)]
    pub console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::Trace)]
    pub file_level: LogLevel,
    #[builder(setters(name = with_log_file))]
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if the log file or its directory cannot be created.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    // stdout only carries the final summary.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(EnvFilter::new(config.console_level.directive()));

    let (file_layer, file_guard) = match &config.log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(create_log_file(path)?);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(EnvFilter::new(config.file_level.directive()));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

fn create_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("failed to create log file {}", path.display()))
}
