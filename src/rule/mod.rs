//! A loaded, validated rule directory and the reconciliation pass over it.
//!
//! [`Rule::load`] parses the rule directory and validates it against the
//! staging root and the account database. [`Rule::install`] then walks the
//! manifest in order, reporting and applying every entry whose live state
//! differs, and fires the hooks those changes trigger.
mod reconcile;
mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::config::hooks::HookRegistry;
use crate::config::manifest::Manifest;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Log;
use crate::resources::accounts::{AccountDb, SystemAccounts};

pub use validate::validate;

/// Capabilities and flags shared by loading and reconciliation.
pub struct Context {
    /// Logger for progress, change lines and hook announcements.
    pub log: Arc<dyn Log>,
    /// Report what would change without applying or running anything.
    pub dry_run: bool,
    /// Runs hook scripts.
    pub executor: Arc<dyn Executor>,
    /// Resolves owners and groups.
    pub accounts: Arc<dyn AccountDb>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &self.executor)
            .field("accounts", &"<dyn AccountDb>")
            .finish()
    }
}

impl Context {
    /// Create a context from explicit capabilities.
    #[must_use]
    pub const fn new(
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        accounts: Arc<dyn AccountDb>,
    ) -> Self {
        Self {
            log,
            dry_run,
            executor,
            accounts,
        }
    }

    /// Create a context that runs real commands against the system account
    /// database.
    #[must_use]
    pub fn system(log: Arc<dyn Log>, dry_run: bool) -> Self {
        Self::new(
            log,
            dry_run,
            Arc::new(SystemExecutor),
            Arc::new(SystemAccounts),
        )
    }
}

/// When a hook fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before any entry is examined.
    AtFirst,
    /// After a triggering entry changed.
    Changed,
    /// After every entry has been processed.
    AtLast,
}

impl Phase {
    /// Registry key, used in hook announcements.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AtFirst => "at_first",
            Self::Changed => "changed",
            Self::AtLast => "at_last",
        }
    }

    /// Short name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AtFirst => "first",
            Self::Changed => "changed",
            Self::AtLast => "last",
        }
    }
}

/// A validated rule directory.
#[derive(Debug, Clone)]
pub struct Rule {
    config: Config,
}

impl Rule {
    /// Load and validate the rule directory at `rule_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `FILES` or the hook registry cannot be loaded, or
    /// `validation error: ...` if validation fails.
    pub fn load(rule_dir: &Path, ctx: &Context) -> Result<Self> {
        ctx.log.debug(&format!("loading rule from {}", rule_dir.display()));
        let config = Config::load(rule_dir)?;
        Self::from_config(config, ctx)
    }

    /// Validate an already loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `validation error: ...` if any check fails.
    pub fn from_config(mut config: Config, ctx: &Context) -> Result<Self> {
        validate(&mut config, ctx.accounts.as_ref()).context("validation error")?;
        ctx.log.debug(&format!(
            "rule validated: {} entries, {} scripts",
            config.manifest.len(),
            config.hooks.scripts.len()
        ));
        Ok(Self { config })
    }

    /// The manifest, with `is_dir` populated.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.config.manifest
    }

    /// The hook registry.
    #[must_use]
    pub const fn hooks(&self) -> &HookRegistry {
        &self.config.hooks
    }

    /// The rule directory this rule was loaded from.
    #[must_use]
    pub fn rule_dir(&self) -> &Path {
        &self.config.rule_dir
    }

    /// Run one reconciliation pass.
    ///
    /// # Errors
    ///
    /// Returns the first entry or script failure; later entries and hooks are
    /// not attempted.
    pub fn install(&self, ctx: &Context) -> Result<()> {
        reconcile::install(&self.config, ctx)
    }
}
