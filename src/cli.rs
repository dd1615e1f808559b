//! Command-line interface definition.

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "barrow",
    about = "Reconcile a filesystem tree against a declarative rule directory",
    version
)]
pub struct Cli {
    /// Subcommand; `install` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, visible_alias = "debug", global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The subcommand to run.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command.unwrap_or(Command::Install)
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Report what would change without applying anything or running hooks
    #[arg(short = 'n', long, visible_alias = "dryrun", global = true)]
    pub dry_run: bool,

    /// Rule directory containing FILES, HOOKS and ROOT/ (default: $BARROW_RULE_DIR, then .)
    #[arg(short, long, visible_alias = "ruledir", global = true)]
    pub rule_dir: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Validate the rule and bring the filesystem in line with it
    Install,
    /// Load and validate the rule without touching the filesystem
    Check,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Check => "check",
            Self::Version => "version",
        }
    }
}
