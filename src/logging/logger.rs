//! Structured logger with dry-run awareness and a run summary.
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Log;
use super::utils::log_path;

/// Implement [`Log`] by delegating to inherent methods of the same name.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that forwards every call to [`tracing`].
///
/// Console and file output are configured by
/// [`init_subscriber`](super::subscriber::init_subscriber); the logger only
/// picks the level and target for each message and counts what the run did.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
    changes: AtomicUsize,
    hooks: AtomicUsize,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// opened by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_path(command),
            changes: AtomicUsize::new(0),
            hooks: AtomicUsize::new(0),
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "barrow::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run notice.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "barrow::dry_run", "{msg}");
    }

    /// Report a differing manifest entry.
    pub fn change(&self, line: &str) {
        self.changes.fetch_add(1, Ordering::Relaxed);
        tracing::info!(target: "barrow::change", "{line}");
    }

    /// Announce a hook.
    pub fn hook(&self, msg: &str) {
        self.hooks.fetch_add(1, Ordering::Relaxed);
        tracing::info!(target: "barrow::hook", "{msg}");
    }

    /// Number of change lines reported so far.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.changes.load(Ordering::Relaxed)
    }

    /// Number of hooks announced so far.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        self.hooks.load(Ordering::Relaxed)
    }

    /// Log the run summary: counts and the log file location.
    pub fn print_summary(&self, dry_run: bool) {
        self.stage("Summary");
        let changes = self.change_count();
        let hooks = self.hook_count();
        let verb = if dry_run { "would change" } else { "changed" };
        self.info(&format!(
            "{changes} {} {verb}, {hooks} {}",
            plural(changes, "entry", "entries"),
            plural(hooks, "hook", "hooks"),
        ));
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

const fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run, change, hook);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn counts_changes_and_hooks() {
        let (log, _tmp, _guard) = super::super::isolated_logger();
        log.change("644 root root /etc/a");
        log.change("755 root root /etc/b");
        log.hook("HOOK(at_first): [x] true");
        log.info("unrelated");
        assert_eq!(log.change_count(), 2);
        assert_eq!(log.hook_count(), 1);
    }

    #[test]
    fn works_through_trait_object() {
        let (log, _tmp, _guard) = super::super::isolated_logger();
        let dyn_log: &dyn Log = &log;
        dyn_log.change("644 root root /x");
        dyn_log.hook("h");
        assert_eq!(log.change_count(), 1);
        assert_eq!(log.hook_count(), 1);
    }

    #[test]
    fn events_reach_log_file() {
        let (log, tmp, _guard) = super::super::isolated_logger();
        log.stage("Reconciling");
        log.change("644 root root /etc/app.conf");
        log.dry_run("skipping hook");
        log.debug("detail");

        let path = tmp.path().join("barrow").join("test.log");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("==> Reconciling"), "{content}");
        assert!(content.contains("[change] 644 root root /etc/app.conf"), "{content}");
        assert!(content.contains("[dry run] skipping hook"), "{content}");
        assert!(content.contains("[debug] detail"), "{content}");
    }

    #[test]
    fn plural_picks_form() {
        assert_eq!(plural(0, "hook", "hooks"), "hooks");
        assert_eq!(plural(1, "hook", "hooks"), "hook");
        assert_eq!(plural(2, "entry", "entries"), "entries");
    }
}
