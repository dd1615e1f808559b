//! Idempotent resource primitives (check + apply pattern).
//!
//! Each manifest entry becomes either a [`directory::DirectoryResource`] or a
//! [`file::FileResource`]. The reconciliation pass asks a resource whether it
//! [`needs_change`](Resource::needs_change) and, outside dry-run mode, calls
//! [`apply`](Resource::apply) when it does.
pub mod accounts;
pub mod digest;
pub mod directory;
pub mod file;
pub mod helpers;

use anyhow::Result;

/// Live state of a resource relative to its declaration.
///
/// # Examples
///
/// ```
/// use barrow::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "mode 755".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(wrong, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the target path.
    Missing,
    /// Target matches the declaration.
    Correct,
    /// Target exists but differs.
    Incorrect {
        /// What was found, for debug output.
        current: String,
    },
}

/// A declared filesystem object that can be checked and applied.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Compare live state against the declaration without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the live state cannot be determined: wrong path
    /// kind, unreadable files, or an account lookup failure.
    fn current_state(&self) -> Result<ResourceState>;

    /// Make the live state match the declaration.
    ///
    /// Only called once [`current_state`](Self::current_state) reported a
    /// difference, so every successful call has written something.
    ///
    /// # Errors
    ///
    /// Returns an error if content or metadata cannot be written.
    fn apply(&self) -> Result<()>;

    /// Whether the live state differs from the declaration.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}
