//! Rule directory loading: the `FILES` manifest and the hook registry.
pub mod hooks;
pub mod manifest;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Manifest file name inside a rule directory.
pub const MANIFEST_FILE: &str = "FILES";

/// YAML hook registry file name.
pub const HOOKS_FILE: &str = "HOOKS";

/// TOML hook registry file name; preferred over [`HOOKS_FILE`] when present.
pub const HOOKS_TOML_FILE: &str = "HOOKS.toml";

/// Staging root directory name.
pub const STAGING_DIR: &str = "ROOT";

/// Parsed contents of a rule directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute rule directory.
    pub rule_dir: PathBuf,
    /// Declared entries, with `source_path` resolved under the staging root.
    pub manifest: manifest::Manifest,
    /// Scripts and triggers.
    pub hooks: hooks::HookRegistry,
}

impl Config {
    /// Load `FILES` and the hook registry from `rule_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending file if either cannot be read
    /// or parsed.
    pub fn load(rule_dir: &Path) -> Result<Self> {
        let manifest_path = rule_dir.join(MANIFEST_FILE);
        let mut manifest = manifest::load(&manifest_path)
            .with_context(|| format!("failed to load {}", manifest_path.display()))?;

        let staging = staging_root(rule_dir);
        for entry in &mut manifest.entries {
            entry.resolve_source(&staging);
        }

        let hooks_path = hooks_path(rule_dir);
        let hooks = hooks::load(&hooks_path)
            .with_context(|| format!("failed to load {}", hooks_path.display()))?;

        Ok(Self {
            rule_dir: rule_dir.to_path_buf(),
            manifest,
            hooks,
        })
    }

    /// Staging root of this rule directory.
    #[must_use]
    pub fn staging_root(&self) -> PathBuf {
        staging_root(&self.rule_dir)
    }
}

/// `<rule_dir>/ROOT`.
#[must_use]
pub fn staging_root(rule_dir: &Path) -> PathBuf {
    rule_dir.join(STAGING_DIR)
}

/// The hook registry file to read: `HOOKS.toml` if it exists, else `HOOKS`.
#[must_use]
pub fn hooks_path(rule_dir: &Path) -> PathBuf {
    let toml = rule_dir.join(HOOKS_TOML_FILE);
    if toml.is_file() {
        toml
    } else {
        rule_dir.join(HOOKS_FILE)
    }
}
