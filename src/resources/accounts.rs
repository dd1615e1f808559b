//! User and group database access.
//!
//! [`AccountDb`] separates "no such account" (`Ok(None)`) from "the lookup
//! itself failed" (`Err`). Only the latter is ever fatal.
use nix::unistd::{Gid, Group, Uid, User};

use crate::error::{AccountKind, ResourceError};

/// Queries against the system account databases.
#[cfg_attr(test, mockall::automock)]
pub trait AccountDb: Send + Sync {
    /// Name of the user with id `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Lookup`] if the id has no entry or the
    /// database cannot be queried.
    fn user_name(&self, uid: u32) -> Result<String, ResourceError>;

    /// Name of the group with id `gid`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Lookup`] if the id has no entry or the
    /// database cannot be queried.
    fn group_name(&self, gid: u32) -> Result<String, ResourceError>;

    /// Id of the user called `name`, `None` if there is no such user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Lookup`] if the database cannot be queried.
    fn user_id(&self, name: &str) -> Result<Option<u32>, ResourceError>;

    /// Id of the group called `name`, `None` if there is no such group.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Lookup`] if the database cannot be queried.
    fn group_id(&self, name: &str) -> Result<Option<u32>, ResourceError>;
}

/// Production [`AccountDb`] backed by `getpwuid_r` / `getgrgid_r` and friends.
#[derive(Debug, Default)]
pub struct SystemAccounts;

fn lookup_error(kind: AccountKind, key: impl ToString, reason: impl ToString) -> ResourceError {
    ResourceError::Lookup {
        kind,
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl AccountDb for SystemAccounts {
    fn user_name(&self, uid: u32) -> Result<String, ResourceError> {
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => Ok(user.name),
            Ok(None) => Err(lookup_error(AccountKind::User, uid, "unknown id")),
            Err(e) => Err(lookup_error(AccountKind::User, uid, e)),
        }
    }

    fn group_name(&self, gid: u32) -> Result<String, ResourceError> {
        match Group::from_gid(Gid::from_raw(gid)) {
            Ok(Some(group)) => Ok(group.name),
            Ok(None) => Err(lookup_error(AccountKind::Group, gid, "unknown id")),
            Err(e) => Err(lookup_error(AccountKind::Group, gid, e)),
        }
    }

    fn user_id(&self, name: &str) -> Result<Option<u32>, ResourceError> {
        User::from_name(name)
            .map(|user| user.map(|u| u.uid.as_raw()))
            .map_err(|e| lookup_error(AccountKind::User, name, e))
    }

    fn group_id(&self, name: &str) -> Result<Option<u32>, ResourceError> {
        Group::from_name(name)
            .map(|group| group.map(|g| g.gid.as_raw()))
            .map_err(|e| lookup_error(AccountKind::Group, name, e))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn root_user_resolves_both_ways() {
        let db = SystemAccounts;
        assert_eq!(db.user_name(0).unwrap(), "root");
        assert_eq!(db.user_id("root").unwrap(), Some(0));
    }

    #[test]
    fn unknown_user_name_is_none() {
        let db = SystemAccounts;
        assert_eq!(db.user_id("no-such-user-barrow-test").unwrap(), None);
    }

    #[test]
    fn unknown_group_name_is_none() {
        let db = SystemAccounts;
        assert_eq!(db.group_id("no-such-group-barrow-test").unwrap(), None);
    }

    #[test]
    fn unresolvable_uid_is_lookup_error() {
        let db = SystemAccounts;
        let err = db.user_name(4_000_000_000).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Lookup {
                kind: AccountKind::User,
                ..
            }
        ));
    }

    #[test]
    fn group_zero_resolves() {
        let db = SystemAccounts;
        let name = db.group_name(0).unwrap();
        assert_eq!(db.group_id(&name).unwrap(), Some(0));
    }
}
