//! File-system primitives used by resource `apply()` methods and by the
//! staging-root scan.
use anyhow::{Context as _, Result};
use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};

use crate::error::ResourceError;

fn apply_error(path: &Path, action: &str, err: &std::io::Error) -> ResourceError {
    ResourceError::Apply {
        path: path.to_path_buf(),
        reason: format!("{action}: {err}"),
    }
}

/// Set permission bits and ownership of `path`.
///
/// # Errors
///
/// Returns [`ResourceError::Apply`] if either call fails.
pub fn set_metadata(path: &Path, mode: u32, uid: u32, gid: u32) -> Result<(), ResourceError> {
    std::os::unix::fs::chown(path, Some(uid), Some(gid))
        .map_err(|e| apply_error(path, "chown", &e))?;
    // chown may clear setuid/setgid bits, so the mode goes second.
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .map_err(|e| apply_error(path, "chmod", &e))
}

/// Create the directory `path` (and missing ancestors) and set its metadata.
///
/// Idempotent: an existing directory only has its metadata updated.
///
/// # Errors
///
/// Returns [`ResourceError::Apply`] if the directory cannot be created or its
/// metadata cannot be set.
pub fn install_dir(path: &Path, mode: u32, uid: u32, gid: u32) -> Result<(), ResourceError> {
    std::fs::create_dir_all(path).map_err(|e| apply_error(path, "mkdir", &e))?;
    set_metadata(path, mode, uid, gid)
}

/// Copy `source` to `target` with the given metadata.
///
/// The content is written to a temporary sibling of `target`, given its
/// final metadata, and renamed into place, so readers never observe a
/// partially written file or a file with the wrong permissions.
///
/// # Errors
///
/// Returns [`ResourceError::Apply`] if any step fails; the temporary file is
/// removed on failure.
pub fn install_file(
    source: &Path,
    target: &Path,
    mode: u32,
    uid: u32,
    gid: u32,
) -> Result<(), ResourceError> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| apply_error(parent, "mkdir", &e))?;
    }

    let tmp = temp_sibling(target);
    let result = std::fs::copy(source, &tmp)
        .map_err(|e| apply_error(target, &format!("copy from {}", source.display()), &e))
        .and_then(|_| set_metadata(&tmp, mode, uid, gid))
        .and_then(|()| std::fs::rename(&tmp, target).map_err(|e| apply_error(target, "rename", &e)));

    if result.is_err() {
        std::fs::remove_file(&tmp).ok();
    }
    result
}

fn temp_sibling(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    target.with_file_name(format!(".{name}.barrow-{}", std::process::id()))
}

/// One entry found while scanning a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the scanned root, with a leading `/`.
    pub path: String,
    /// Whether the entry is a directory (symlinks are not followed).
    pub is_dir: bool,
}

/// Recursively list everything under `root`, excluding `root` itself.
///
/// Paths are reported as `/`-prefixed strings relative to `root`, i.e. in
/// the same form as absolute manifest paths.
///
/// # Errors
///
/// Returns an error if `root` or any directory beneath it cannot be read.
pub fn walk_tree(root: &Path) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    walk_into(root, "", &mut entries)?;
    Ok(entries)
}

fn walk_into(dir: &Path, prefix: &str, out: &mut Vec<TreeEntry>) -> Result<()> {
    let read = std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    for entry in read {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        let rel = format!("{prefix}/{}", entry.file_name().to_string_lossy());
        out.push(TreeEntry {
            path: rel.clone(),
            is_dir: file_type.is_dir(),
        });
        if file_type.is_dir() {
            walk_into(&entry.path(), &rel, out)?;
        }
    }
    Ok(())
}
