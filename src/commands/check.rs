//! Command: load and validate a rule directory without applying it.
use std::sync::Arc;

use anyhow::Result;

use super::resolve_rule_dir;
use crate::cli::GlobalOpts;
use crate::logging::{Log, Logger};
use crate::rule::{Context, Rule};

/// Run the check command.
///
/// # Errors
///
/// Returns an error if the rule cannot be loaded or fails validation.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let rule_dir = resolve_rule_dir(global)?;
    let shared: Arc<dyn Log> = log.clone();
    let ctx = Context::system(shared, true);

    log.stage("Validating rule");
    let rule = Rule::load(&rule_dir, &ctx)?;
    let dirs = rule.manifest().iter().filter(|e| e.is_dir).count();
    log.info(&format!(
        "{} is valid: {} entries ({dirs} directories), {} scripts",
        rule_dir.display(),
        rule.manifest().len(),
        rule.hooks().scripts.len()
    ));
    Ok(())
}
