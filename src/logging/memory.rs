//! In-memory [`Log`] implementation.
use std::sync::Mutex;

use super::types::{Log, LogEntry};

/// Captures every log call in order instead of printing it.
///
/// Used by tests, and by callers that want to inspect what a pass reported
/// (e.g. the change lines of a dry run) before deciding what to show.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries in call order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Messages of all [`LogEntry::Change`] entries.
    #[must_use]
    pub fn changes(&self) -> Vec<String> {
        self.collect(|e| matches!(e, LogEntry::Change(_)))
    }

    /// Messages of all [`LogEntry::Hook`] entries.
    #[must_use]
    pub fn hooks(&self) -> Vec<String> {
        self.collect(|e| matches!(e, LogEntry::Hook(_)))
    }

    /// Messages of all [`LogEntry::DryRun`] entries.
    #[must_use]
    pub fn dry_runs(&self) -> Vec<String> {
        self.collect(|e| matches!(e, LogEntry::DryRun(_)))
    }

    fn collect(&self, keep: impl Fn(&LogEntry) -> bool) -> Vec<String> {
        self.entries()
            .iter()
            .filter(|e| keep(e))
            .map(|e| e.message().to_string())
            .collect()
    }

    fn push(&self, entry: LogEntry) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(entry);
        }
    }
}

/// Implement [`Log`] by pushing each call as the matching [`LogEntry`].
macro_rules! capture_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.push(LogEntry::$variant(msg.to_string()));
            }
        )+
    };
}

impl Log for MemoryLog {
    capture_log_methods!(
        stage => Stage,
        info => Info,
        debug => Debug,
        warn => Warn,
        error => Error,
        dry_run => DryRun,
        change => Change,
        hook => Hook,
    );
}
