//! Declarative filesystem reconciliation with lifecycle hooks.
//!
//! A rule directory holds a `FILES` manifest (mode, owner, group and path
//! per line), a hook registry (`HOOKS` in YAML or `HOOKS.toml`), and a
//! `ROOT/` staging tree mirroring the target filesystem. One pass compares
//! every declared path with the live system, reports and applies what
//! differs, and runs the scripts those changes trigger.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse the manifest and hook registry
//! - **[`resources`]**: idempotent `check + apply` primitives for files and directories
//! - **[`rule`]**: validation and the reconciliation pass
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `check`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod resources;
pub mod rule;
