//! Directory resource: existence, permission bits, owner and group.
use anyhow::Result;
use std::os::unix::fs::{MetadataExt as _, PermissionsExt as _};
use std::path::{Path, PathBuf};

use super::accounts::AccountDb;
use super::helpers::fs::install_dir;
use super::{Resource, ResourceState};
use crate::error::{AccountKind, ResourceError};

/// Permission and special bits; everything above is the file type.
const PERMISSION_BITS: u32 = 0o7777;

/// A declared directory.
pub struct DirectoryResource<'a> {
    /// Live path.
    pub target: PathBuf,
    /// Expected permission bits.
    pub mode: u32,
    /// Expected owning user.
    pub owner: String,
    /// Expected owning group.
    pub group: String,
    accounts: &'a dyn AccountDb,
}

impl std::fmt::Debug for DirectoryResource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryResource")
            .field("target", &self.target)
            .field("mode", &format_args!("{:o}", self.mode))
            .field("owner", &self.owner)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl<'a> DirectoryResource<'a> {
    /// Create a new directory resource.
    #[must_use]
    pub const fn new(
        target: PathBuf,
        mode: u32,
        owner: String,
        group: String,
        accounts: &'a dyn AccountDb,
    ) -> Self {
        Self {
            target,
            mode,
            owner,
            group,
            accounts,
        }
    }

    /// Create from a manifest entry.
    #[must_use]
    pub fn from_entry(entry: &crate::config::manifest::FileEntry, accounts: &'a dyn AccountDb) -> Self {
        Self::new(
            entry.target(),
            entry.mode,
            entry.owner.clone(),
            entry.group.clone(),
            accounts,
        )
    }
}

impl Resource for DirectoryResource<'_> {
    fn description(&self) -> String {
        format!(
            "{:o} {} {} {}/",
            self.mode,
            self.owner,
            self.group,
            self.target.display()
        )
    }

    fn current_state(&self) -> Result<ResourceState> {
        let meta = match std::fs::metadata(&self.target) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ResourceState::Missing);
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_dir() {
            return Err(ResourceError::TypeMismatch {
                path: self.target.clone(),
                expected: "directory",
            }
            .into());
        }

        let mode = meta.permissions().mode() & PERMISSION_BITS;
        if mode != self.mode {
            return Ok(ResourceState::Incorrect {
                current: format!("mode {mode:o}"),
            });
        }

        let owner = self.accounts.user_name(meta.uid())?;
        let group = self.accounts.group_name(meta.gid())?;
        if owner != self.owner {
            return Ok(ResourceState::Incorrect {
                current: format!("owner {owner}"),
            });
        }
        if group != self.group {
            return Ok(ResourceState::Incorrect {
                current: format!("group {group}"),
            });
        }
        Ok(ResourceState::Correct)
    }

    fn apply(&self) -> Result<()> {
        let (uid, gid) = resolve_ids(self.accounts, &self.target, &self.owner, &self.group)?;
        install_dir(&self.target, self.mode, uid, gid)?;
        Ok(())
    }
}

/// Resolve `owner` and `group` to numeric ids for an apply on `target`.
///
/// # Errors
///
/// Returns [`ResourceError::Apply`] if either name does not exist, or
/// [`ResourceError::Lookup`] if the database cannot be queried.
pub fn resolve_ids(
    accounts: &dyn AccountDb,
    target: &Path,
    owner: &str,
    group: &str,
) -> Result<(u32, u32), ResourceError> {
    let unknown = |kind: AccountKind, name: &str| ResourceError::Apply {
        path: target.to_path_buf(),
        reason: format!("{kind} `{name}` not found"),
    };
    let uid = accounts
        .user_id(owner)?
        .ok_or_else(|| unknown(AccountKind::User, owner))?;
    let gid = accounts
        .group_id(group)?
        .ok_or_else(|| unknown(AccountKind::Group, group))?;
    Ok((uid, gid))
}

/// Whether the directory at `path` differs from the declared owner, group
/// and mode. A missing directory always differs.
///
/// # Errors
///
/// Returns [`ResourceError::TypeMismatch`] if `path` is not a directory, or
/// [`ResourceError::Lookup`] if its owner or group cannot be resolved.
pub fn has_dir_diff(
    path: &Path,
    owner: &str,
    group: &str,
    mode: u32,
    accounts: &dyn AccountDb,
) -> Result<bool> {
    DirectoryResource::new(
        path.to_path_buf(),
        mode,
        owner.to_string(),
        group.to_string(),
        accounts,
    )
    .needs_change()
}
