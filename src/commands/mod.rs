//! Subcommand implementations.

pub mod check;
pub mod install;
pub mod version;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;

/// Environment variable naming the rule directory when `--rule-dir` is absent.
pub const RULE_DIR_ENV: &str = "BARROW_RULE_DIR";

/// Resolve the rule directory: `--rule-dir`, then `$BARROW_RULE_DIR`, then
/// the current directory. The result is always absolute.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_rule_dir(global: &GlobalOpts) -> Result<PathBuf> {
    let dir = global
        .rule_dir
        .clone()
        .or_else(|| {
            std::env::var_os(RULE_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("."));
    std::path::absolute(&dir).with_context(|| format!("invalid rule dir: {}", dir.display()))
}
