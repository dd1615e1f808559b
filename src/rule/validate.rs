//! Rule validation.
//!
//! Each check returns the findings it produced; a check that cannot run at
//! all (the account database is unreachable, the staging root cannot be
//! walked) fails immediately. Findings from every check are gathered into a
//! single [`ValidationError`].
use std::collections::{HashMap, HashSet};

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::config::manifest::{Manifest, rooted};
use crate::error::ValidationError;
use crate::resources::accounts::AccountDb;
use crate::resources::helpers::fs::walk_tree;

/// Validate `config`, marking entries whose staged path is a directory.
///
/// # Errors
///
/// Returns [`ValidationError`] carrying every finding, or the first hard
/// failure of a check.
pub fn validate(config: &mut Config, accounts: &dyn AccountDb) -> Result<()> {
    let staging = config.staging_root();
    let mut messages = Vec::new();

    messages.extend(check_users(&config.manifest, accounts)?);
    messages.extend(check_groups(&config.manifest));
    messages.extend(
        check_staging_root(&mut config.manifest, &staging).context("failed to scan files")?,
    );
    messages.extend(check_duplicates(&config.manifest));
    let hooks = config.hooks.validate()?;
    if !hooks.is_empty() {
        messages.push(hooks);
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { messages }.into())
    }
}

fn check_users(manifest: &Manifest, accounts: &dyn AccountDb) -> Result<Vec<String>> {
    let mut messages = Vec::new();
    for user in manifest.users() {
        let found = accounts
            .user_id(user)
            .with_context(|| format!("can not lookup user: {user}"))?;
        if found.is_none() {
            messages.push(format!("user `{user}` not found"));
        }
    }
    Ok(messages)
}

// TODO: resolve each group with `AccountDb::group_id` and report
// "group `<name>` not found" like `check_users`.
const fn check_groups(_manifest: &Manifest) -> Vec<String> {
    Vec::new()
}

fn check_staging_root(manifest: &mut Manifest, staging: &std::path::Path) -> Result<Vec<String>> {
    let staged: HashMap<String, bool> = walk_tree(staging)?
        .into_iter()
        .map(|e| (e.path, e.is_dir))
        .collect();

    let mut reported = HashSet::new();
    let mut messages = Vec::new();
    for entry in &mut manifest.entries {
        let path = normalize(&entry.path);
        match staged.get(&path) {
            Some(&is_dir) => entry.is_dir = is_dir,
            None => {
                if reported.insert(path.clone()) {
                    messages.push(format!("ROOT dir not included: {path}"));
                }
            }
        }
    }
    Ok(messages)
}

/// Root `path` and drop a trailing `/`, so `etc/app/` matches the staged
/// `/etc/app`.
fn normalize(path: &str) -> String {
    let mut path = rooted(path);
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

fn check_duplicates(manifest: &Manifest) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    manifest
        .iter()
        .map(|e| normalize(&e.path))
        .filter(|path| !seen.insert(path.clone()) && reported.insert(path.clone()))
        .map(|path| format!("duplicate path in FILES: {path}"))
        .collect()
}
