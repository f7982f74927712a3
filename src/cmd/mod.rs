// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   publish (default), clean, options
//! ```

pub mod clean;
pub mod config;
pub mod publish;

#[cfg(test)]
mod tests;
