//! One reconciliation pass over a validated rule.
use std::collections::HashSet;

use anyhow::{Context as _, Result};

use super::{Context, Phase};
use crate::config::Config;
use crate::config::hooks::HookRegistry;
use crate::config::manifest::FileEntry;
use crate::resources::directory::DirectoryResource;
use crate::resources::file::FileResource;
use crate::resources::{Resource, ResourceState};

/// `once` scripts triggered during the pass, in first-trigger order.
#[derive(Debug, Default)]
struct OnceHooks<'a> {
    order: Vec<&'a str>,
    seen: HashSet<&'a str>,
}

impl<'a> OnceHooks<'a> {
    fn defer(&mut self, name: &'a str) {
        if self.seen.insert(name) {
            self.order.push(name);
        }
    }
}

/// Run `at_first`, every manifest entry, deferred `once` scripts, then
/// `at_last`, stopping at the first failure.
pub(super) fn install(config: &Config, ctx: &Context) -> Result<()> {
    let hooks = &config.hooks;

    for name in &hooks.at_first {
        fire(hooks, name, Phase::AtFirst, ctx)?;
    }

    let mut once = OnceHooks::default();
    for entry in config.manifest.iter() {
        let changed = reconcile_entry(entry, ctx)
            .with_context(|| format!("failed to install {}", entry.source_path.display()))?;
        if !changed {
            continue;
        }
        for name in hooks.triggers_for(&entry.path) {
            let script = hooks
                .script(name)
                .with_context(|| script_context(name, Phase::Changed))?;
            if script.once {
                ctx.log.debug(&format!("deferring once script `{name}`"));
                once.defer(name);
            } else {
                fire(hooks, name, Phase::Changed, ctx)?;
            }
        }
    }

    for name in once.order {
        fire(hooks, name, Phase::Changed, ctx)?;
    }

    for name in &hooks.at_last {
        fire(hooks, name, Phase::AtLast, ctx)?;
    }
    Ok(())
}

/// Bring one entry in line, returning whether it differed.
fn reconcile_entry(entry: &FileEntry, ctx: &Context) -> Result<bool> {
    let accounts = ctx.accounts.as_ref();
    if entry.is_dir {
        reconcile(&DirectoryResource::from_entry(entry, accounts), entry, ctx)
    } else {
        reconcile(&FileResource::from_entry(entry, accounts), entry, ctx)
    }
}

fn reconcile<R: Resource>(resource: &R, entry: &FileEntry, ctx: &Context) -> Result<bool> {
    let desc = resource.description();
    match resource.current_state()? {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            return Ok(false);
        }
        ResourceState::Missing => ctx.log.debug(&format!("{desc}: missing")),
        ResourceState::Incorrect { current } => {
            ctx.log.debug(&format!("{desc}: currently {current}"));
        }
    }
    apply_change(resource, entry, ctx)?;
    Ok(true)
}

/// Report the change line and, outside dry-run mode, apply it.
fn apply_change<R: Resource>(resource: &R, entry: &FileEntry, ctx: &Context) -> Result<()> {
    ctx.log.change(&entry.to_string());
    if ctx.dry_run {
        return Ok(());
    }
    resource.apply()?;
    ctx.log.debug(&format!("applied: {}", resource.description()));
    Ok(())
}

fn script_context(name: &str, phase: Phase) -> String {
    format!("failed to execute `{name}` script at {} hook", phase.label())
}

/// Announce and, outside dry-run mode, run the script called `name`.
fn fire(hooks: &HookRegistry, name: &str, phase: Phase, ctx: &Context) -> Result<()> {
    run_script(hooks, name, phase, ctx).with_context(|| script_context(name, phase))
}

fn run_script(hooks: &HookRegistry, name: &str, phase: Phase, ctx: &Context) -> Result<()> {
    let script = hooks.script(name)?;
    ctx.log
        .hook(&format!("HOOK({}): [{name}] {}", phase.key(), script.cmd));
    if ctx.dry_run {
        ctx.log.dry_run(&format!("skipping `{name}`"));
        return Ok(());
    }
    let result = ctx.executor.run_command_line(&script.cmd)?;
    let output = result.combined();
    let output = output.trim_end();
    if !output.is_empty() {
        ctx.log.info(output);
    }
    Ok(())
}
