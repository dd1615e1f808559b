//! Process execution for hook scripts.
//!
//! Hook commands are plain command lines: they are split shell-style (quotes
//! and backslash escapes honoured, no expansion) and the first word is
//! spawned directly, without a shell.
use anyhow::Result;
use std::process::{Command, Output};

use crate::error::ScriptError;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Stdout followed by stderr, the way a terminal would interleave them
    /// for a command that writes to both sequentially.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process spawning so hook firing can be tested without
/// running real commands.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `program` with `args`, failing on spawn error or non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Spawn`] or [`ScriptError::Failed`].
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Tokenize `command_line` and run it.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Parse`] or [`ScriptError::Empty`] if the line
    /// cannot be tokenized, otherwise whatever [`Executor::run`] returns.
    fn run_command_line(&self, command_line: &str) -> Result<ExecResult> {
        let words = tokenize(command_line)?;
        let Some((program, args)) = words.split_first() else {
            return Err(ScriptError::Empty.into());
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(program, &args)
    }
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ScriptError::Spawn {
                program: program.to_string(),
                source,
            })?;
        let result = ExecResult::from(output);
        if !result.success {
            let command = std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" ");
            return Err(ScriptError::Failed {
                command,
                code: result.code.unwrap_or(-1),
                output: result.combined().trim().to_string(),
            }
            .into());
        }
        Ok(result)
    }
}

/// Split a command line into words using POSIX shell quoting rules.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] on unbalanced quotes or a dangling escape.
pub fn tokenize(command_line: &str) -> Result<Vec<String>, ScriptError> {
    shell_words::split(command_line).map_err(|e| ScriptError::Parse {
        command: command_line.to_string(),
        reason: e.to_string(),
    })
}
