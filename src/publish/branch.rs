// labtohub: GitLab to GitHub publishing tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch names derived from commit messages.
//!
//! ```text
//! "Fix typo in README!"  -> fix-typo-in-readme
//! "  ***  "              -> <fallback>  ("new")
//! taken "fix-typo"       -> fix-typo-2, fix-typo-3, ...
//! ```

use std::path::Path;

use crate::error::{LabResult, bail_out};
use crate::git::query::local_branch_exists;

/// Upper bound on numeric suffixes tried by [`unique_branch_name`].
const MAX_SUFFIX: usize = 100;

/// Turn a commit message into a branch name.
///
/// ASCII alphanumerics are lower-cased, everything else becomes `-`, runs of
/// `-` collapse and the ends are trimmed. An empty result yields `fallback`.
#[must_use]
pub fn branch_name_from_message(message: &str, fallback: &str) -> String {
    let mut name = String::with_capacity(message.len());
    for c in message.trim().chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.ends_with('-') {
            name.push('-');
        }
    }

    let name = name.trim_matches('-');
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

/// First of `base`, `base-2`, `base-3`, ... that is neither reserved nor an
/// existing local branch.
///
/// The content branch is deleted after each run, so reusing a name the user
/// already owns would destroy their branch.
///
/// # Errors
///
/// Returns an error if branch lookup fails or no free name is found.
pub fn unique_branch_name(repo: &Path, base: &str, reserved: &[&str]) -> LabResult<String> {
    for n in 1..=MAX_SUFFIX {
        let candidate = if n == 1 {
            base.to_string()
        } else {
            format!("{base}-{n}")
        };
        if reserved.contains(&candidate.as_str()) {
            continue;
        }
        if !local_branch_exists(repo, &candidate)? {
            return Ok(candidate);
        }
    }
    Err(bail_out(format!(
        "no free branch name for '{base}' after {MAX_SUFFIX} attempts"
    )))
}
