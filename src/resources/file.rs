//! Regular file resource: content copied from the staging root.
//!
//! Only content is compared. Mode, owner and group are written together
//! with the content whenever it differs, never diffed on their own.
//!
//! [`has_file_diff`] treats an absent target as a read error. The resource
//! checks for the target first so that an absent file is
//! [`ResourceState::Missing`] and gets installed.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::accounts::AccountDb;
use super::digest::file_digest;
use super::directory::resolve_ids;
use super::helpers::fs::install_file;
use super::{Resource, ResourceState};

/// A declared regular file backed by a staged copy.
pub struct FileResource<'a> {
    /// Staged content.
    pub source: PathBuf,
    /// Live path.
    pub target: PathBuf,
    /// Permission bits applied with the content.
    pub mode: u32,
    /// Owner applied with the content.
    pub owner: String,
    /// Group applied with the content.
    pub group: String,
    accounts: &'a dyn AccountDb,
}

impl std::fmt::Debug for FileResource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileResource")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("mode", &format_args!("{:o}", self.mode))
            .field("owner", &self.owner)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl<'a> FileResource<'a> {
    /// Create from a manifest entry whose `source_path` has been resolved.
    #[must_use]
    pub fn from_entry(entry: &crate::config::manifest::FileEntry, accounts: &'a dyn AccountDb) -> Self {
        Self {
            source: entry.source_path.clone(),
            target: entry.target(),
            mode: entry.mode,
            owner: entry.owner.clone(),
            group: entry.group.clone(),
            accounts,
        }
    }
}

impl Resource for FileResource<'_> {
    fn description(&self) -> String {
        format!(
            "{:o} {} {} {}",
            self.mode,
            self.owner,
            self.group,
            self.target.display()
        )
    }

    fn current_state(&self) -> Result<ResourceState> {
        match std::fs::symlink_metadata(&self.target) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ResourceState::Missing);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("stat {}", self.target.display()));
            }
            Ok(_) => {}
        }
        if has_file_diff(&self.source, &self.target)? {
            Ok(ResourceState::Incorrect {
                current: "content differs".to_string(),
            })
        } else {
            Ok(ResourceState::Correct)
        }
    }

    fn apply(&self) -> Result<()> {
        let (uid, gid) = resolve_ids(self.accounts, &self.target, &self.owner, &self.group)?;
        install_file(&self.source, &self.target, self.mode, uid, gid)?;
        Ok(())
    }
}

/// Whether `target` has different content from `source`.
///
/// A missing `target` is a read error here, not a difference; callers that
/// want "missing means differs" must check existence first.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn has_file_diff(source: &Path, target: &Path) -> Result<bool> {
    let a = file_digest(source).context("digest source")?;
    let b = file_digest(target).context("digest target")?;
    Ok(a != b)
}
