//! `FILES` manifest parsing.
//!
//! One entry per line:
//!
//! ```text
//! <octal-mode> <owner> <group> <path>
//! ```
//!
//! The path is everything after the third space and may itself contain
//! spaces. Blank lines are skipped; there is no comment syntax.
use anyhow::Result;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ParseError;

/// Declared state for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Permission bits, without any file-type bits.
    pub mode: u32,
    /// Owning user name.
    pub owner: String,
    /// Owning group name.
    pub group: String,
    /// Target path as written in the manifest, relative to `/`.
    ///
    /// The leading `/` is optional: `etc/app.conf` and `/etc/app.conf`
    /// name the same target.
    pub path: String,
    /// Same path re-rooted under the staging root; empty until resolved.
    pub source_path: PathBuf,
    /// Whether the staging root holds a directory at this path.
    ///
    /// Set during validation, `false` until then.
    pub is_dir: bool,
}

impl FileEntry {
    /// Target path on the live filesystem.
    #[must_use]
    pub fn target(&self) -> PathBuf {
        PathBuf::from(rooted(&self.path))
    }

    /// Set `source_path` to this entry's path under `staging_root`.
    pub fn resolve_source(&mut self, staging_root: &Path) {
        self.source_path = staging_path(staging_root, &self.path);
    }
}

/// The change line: `<octal-mode> <owner> <group> <path>`.
impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o} {} {} {}", self.mode, self.owner, self.group, self.path)
    }
}

/// Anchor a manifest path at `/`.
#[must_use]
pub fn rooted(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Join a manifest path onto `staging_root`.
///
/// `Path::join` would discard the root for absolute paths, so the leading
/// separators are stripped first.
#[must_use]
pub fn staging_path(staging_root: &Path, path: &str) -> PathBuf {
    staging_root.join(path.trim_start_matches('/'))
}

/// Ordered list of declared entries; order is install and hook-firing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Entries in file order.
    pub entries: Vec<FileEntry>,
}

impl Manifest {
    /// Distinct owner names in first-occurrence order.
    #[must_use]
    pub fn users(&self) -> Vec<&str> {
        unique_in_order(self.entries.iter().map(|e| e.owner.as_str()))
    }

    /// Distinct group names in first-occurrence order.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        unique_in_order(self.entries.iter().map(|e| e.group.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the manifest declares nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in manifest order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }
}

fn unique_in_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(*item)).collect()
}

/// Load and parse a manifest file.
///
/// # Errors
///
/// Returns [`ParseError::Io`] if the file cannot be read, or any error from
/// [`parse`].
pub fn load(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&content)?)
}

/// Parse manifest text.
///
/// # Examples
///
/// ```
/// use barrow::config::manifest::parse;
///
/// let manifest = parse("755 root root /etc/app\n644 root wheel /etc/app/app.conf\n").unwrap();
/// assert_eq!(manifest.len(), 2);
/// assert_eq!(manifest.entries[1].mode, 0o644);
/// assert_eq!(manifest.entries[1].group, "wheel");
/// ```
///
/// # Errors
///
/// Returns [`ParseError::MissingFields`] if a line has fewer than four
/// fields, or [`ParseError::InvalidMode`] if the mode is not octal.
pub fn parse(content: &str) -> Result<Manifest, ParseError> {
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        let line_num = idx + 1;

        let fields: Vec<&str> = line.splitn(4, ' ').collect();
        let [mode, owner, group, path] = fields.as_slice() else {
            return Err(ParseError::MissingFields {
                line: line_num,
                found: fields.len(),
            });
        };

        let mode = u32::from_str_radix(mode, 8).map_err(|source| ParseError::InvalidMode {
            line: line_num,
            value: (*mode).to_string(),
            source,
        })?;

        entries.push(FileEntry {
            mode,
            owner: (*owner).to_string(),
            group: (*group).to_string(),
            path: (*path).to_string(),
            source_path: PathBuf::new(),
            is_dir: false,
        });
    }

    Ok(Manifest { entries })
}
