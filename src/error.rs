//! Domain-specific error types for the reconciliation engine.
//!
//! Internal modules construct these typed errors and return them through
//! [`anyhow::Result`], attaching context (which file, which script, which
//! check) as the error travels up to the command boundary.
//!
//! # Error hierarchy
//!
//! ```text
//! ParseError        malformed FILES / HOOKS, unreadable rule files
//! ResourceError     wrong path kind, user/group lookup, apply failures
//! ValidationError   aggregated unknown-user / missing-path messages
//! ScriptError       hook command could not be parsed, spawned, or failed
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the manifest or the hook registry.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A manifest line has fewer than four fields.
    #[error("line {line}: expected `<mode> <owner> <group> <path>`, found {found} field(s)")]
    MissingFields {
        /// 1-based line number.
        line: usize,
        /// Number of fields actually present.
        found: usize,
    },

    /// The mode field is not a valid octal number.
    #[error("line {line}: invalid octal mode `{value}`")]
    InvalidMode {
        /// 1-based line number.
        line: usize,
        /// The offending field.
        value: String,
        /// Underlying integer parse failure.
        source: std::num::ParseIntError,
    },

    /// The hook registry document is not structurally valid.
    #[error("malformed hook registry: {0}")]
    Malformed(String),

    /// A rule file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Which account database a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// The user database (`/etc/passwd`, NSS, ...).
    User,
    /// The group database.
    Group,
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// Errors that arise from checking or applying a single manifest entry.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The path exists but is not of the declared kind.
    #[error("{}: not a {expected}", path.display())]
    TypeMismatch {
        /// Path that was inspected.
        path: PathBuf,
        /// The kind the manifest expects (e.g. `"directory"`).
        expected: &'static str,
    },

    /// The account database could not answer a query.
    ///
    /// This is distinct from "no such user": an unresolvable id or a failing
    /// lookup mechanism is never treated as a difference.
    #[error("can not lookup {kind} {key}: {reason}")]
    Lookup {
        /// User or group database.
        kind: AccountKind,
        /// The name or numeric id that was queried.
        key: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Content or metadata could not be applied to the target.
    #[error("cannot apply {}: {reason}", path.display())]
    Apply {
        /// Target path.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },
}

/// Aggregated, non-fatal validation findings.
///
/// Every check runs to completion before this is raised; its display form is
/// all messages joined with `", "`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", messages.join(", "))]
pub struct ValidationError {
    /// Individual findings in check order.
    pub messages: Vec<String>,
}

/// Errors raised while running a hook script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The command line could not be tokenized.
    #[error("failed to parse command line `{command}`: {reason}")]
    Parse {
        /// Raw command line.
        command: String,
        /// Tokenizer message.
        reason: String,
    },

    /// The command line contains no program.
    #[error("empty command line")]
    Empty,

    /// The process could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The process exited unsuccessfully.
    #[error("failed to execute command: `{command}` (exit {code}): {output}")]
    Failed {
        /// Tokenized command line, re-joined for display.
        command: String,
        /// Exit code, `-1` when killed by a signal.
        code: i32,
        /// Combined stdout/stderr.
        output: String,
    },

    /// A trigger list references a name with no script definition.
    #[error("script `{0}` is not defined")]
    Unknown(String),
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn missing_fields_display() {
        let e = ParseError::MissingFields { line: 3, found: 2 };
        assert_eq!(
            e.to_string(),
            "line 3: expected `<mode> <owner> <group> <path>`, found 2 field(s)"
        );
    }

    #[test]
    fn invalid_mode_has_source() {
        use std::error::Error as _;
        let source = u32::from_str_radix("89", 8).unwrap_err();
        let e = ParseError::InvalidMode {
            line: 1,
            value: "89".to_string(),
            source,
        };
        assert!(e.to_string().contains("invalid octal mode `89`"));
        assert!(e.source().is_some());
    }

    #[test]
    fn io_display_names_path() {
        let e = ParseError::Io {
            path: PathBuf::from("/rules/FILES"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().contains("/rules/FILES"));
    }

    #[test]
    fn type_mismatch_display() {
        let e = ResourceError::TypeMismatch {
            path: PathBuf::from("/etc/app"),
            expected: "directory",
        };
        assert_eq!(e.to_string(), "/etc/app: not a directory");
    }

    #[test]
    fn lookup_display() {
        let e = ResourceError::Lookup {
            kind: AccountKind::Group,
            key: "1234".to_string(),
            reason: "no entry".to_string(),
        };
        assert_eq!(e.to_string(), "can not lookup group 1234: no entry");
    }

    #[test]
    fn validation_error_joins_messages() {
        let e = ValidationError {
            messages: vec![
                "user `bob` not found".to_string(),
                "ROOT dir not included: /etc/app.conf".to_string(),
            ],
        };
        assert_eq!(
            e.to_string(),
            "user `bob` not found, ROOT dir not included: /etc/app.conf"
        );
    }

    #[test]
    fn script_unknown_display() {
        assert_eq!(
            ScriptError::Unknown("restart".to_string()).to_string(),
            "script `restart` is not defined"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ParseError>();
        assert_send_sync::<ResourceError>();
        assert_send_sync::<ValidationError>();
        assert_send_sync::<ScriptError>();
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let _a: anyhow::Error = ScriptError::Empty.into();
        let _b: anyhow::Error = ValidationError { messages: vec![] }.into();
    }
}
