//! Where the log file lives, and how its lines are cleaned and stamped.
use std::path::PathBuf;

/// `chrono` format of the log file header stamp.
pub(super) const HEADER_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// `chrono` format of the per-line stamp.
pub(super) const LINE_STAMP: &str = "%H:%M:%S";

/// Current UTC time rendered with `format`.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// Drop terminal escape sequences so the log file holds plain text.
///
/// A CSI sequence (`ESC [` ... final byte in `@`..=`~`) is removed whole;
/// any other escape takes the character after it along.
pub(super) fn plain(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
    }
    out
}

/// `<cache>/barrow/<command>.log`, creating the directory on the way.
///
/// `<cache>` is `$XDG_CACHE_HOME` when set and non-empty, else
/// `$HOME/.cache`. `None` when the directory cannot be created.
pub(super) fn log_path(command: &str) -> Option<PathBuf> {
    let cache = match std::env::var_os("XDG_CACHE_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var_os("HOME")
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
            .join(".cache"),
    };
    let dir = cache.join("barrow");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    #[test]
    fn plain_drops_colour_codes() {
        assert_eq!(plain("\x1b[1;31mfailed\x1b[0m: /etc/app.conf"), "failed: /etc/app.conf");
        assert_eq!(plain("HOOK(at_last): [done]"), "HOOK(at_last): [done]");
        assert_eq!(plain(""), "");
    }

    #[test]
    fn plain_drops_cursor_sequences() {
        assert_eq!(plain("\x1b[2K\x1b[1Gchanged"), "changed");
        assert_eq!(plain("a\x1b7b"), "ab");
    }

    #[test]
    fn stamps_parse_back() {
        NaiveDateTime::parse_from_str(&utc_now(HEADER_STAMP), HEADER_STAMP).unwrap();
        NaiveTime::parse_from_str(&utc_now(LINE_STAMP), LINE_STAMP).unwrap();
    }

    #[test]
    #[allow(unsafe_code)]
    fn log_path_lives_under_xdg_cache_home() {
        let tmp = tempfile::tempdir().unwrap();
        let _env = crate::logging::TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: env access is serialized by TEST_ENV_MUTEX.
        unsafe { std::env::set_var("XDG_CACHE_HOME", tmp.path()) };
        let path = log_path("check");
        // SAFETY: as above.
        unsafe { std::env::remove_var("XDG_CACHE_HOME") };

        assert_eq!(path.unwrap(), tmp.path().join("barrow/check.log"));
        assert!(tmp.path().join("barrow").is_dir());
    }
}
