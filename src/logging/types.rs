//! Core logging types: the [`Log`] trait and captured entries.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing` for the console
/// and log file; [`MemoryLog`](super::memory::MemoryLog) captures entries so
/// tests can assert on exactly what a reconciliation pass reported.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run notice.
    fn dry_run(&self, msg: &str);
    /// Report a manifest entry whose live state differs.
    fn change(&self, line: &str);
    /// Announce a hook firing (emitted in dry-run mode too).
    fn hook(&self, msg: &str);
}

/// One captured log call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// [`Log::stage`].
    Stage(String),
    /// [`Log::info`].
    Info(String),
    /// [`Log::debug`].
    Debug(String),
    /// [`Log::warn`].
    Warn(String),
    /// [`Log::error`].
    Error(String),
    /// [`Log::dry_run`].
    DryRun(String),
    /// [`Log::change`].
    Change(String),
    /// [`Log::hook`].
    Hook(String),
}

impl LogEntry {
    /// The message, whatever the kind.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Stage(m)
            | Self::Info(m)
            | Self::Debug(m)
            | Self::Warn(m)
            | Self::Error(m)
            | Self::DryRun(m)
            | Self::Change(m)
            | Self::Hook(m) => m,
        }
    }
}
