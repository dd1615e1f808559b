//! Command: load, validate and reconcile a rule directory.
use std::sync::Arc;

use anyhow::Result;

use super::{resolve_rule_dir, version};
use crate::cli::GlobalOpts;
use crate::logging::{Log, Logger};
use crate::rule::{Context, Rule};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the rule cannot be loaded or validated, or if any
/// entry or hook fails during the pass.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let rule_dir = resolve_rule_dir(global)?;
    log.info(&format!("barrow {}", version::string()));
    if global.dry_run {
        log.dry_run("dry-run mode enabled, nothing will be changed");
    }

    let shared: Arc<dyn Log> = log.clone();
    let ctx = Context::system(shared, global.dry_run);

    log.stage("Loading rule");
    let rule = Rule::load(&rule_dir, &ctx)?;
    log.info(&format!(
        "{}: {} entries, {} scripts",
        rule_dir.display(),
        rule.manifest().len(),
        rule.hooks().scripts.len()
    ));

    log.stage("Reconciling");
    rule.install(&ctx)?;

    log.print_summary(global.dry_run);
    Ok(())
}
