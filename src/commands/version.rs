//! Command: print version information.

/// The build version: `BARROW_VERSION` from `git describe` when available.
#[must_use]
pub fn string() -> &'static str {
    option_env!("BARROW_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the barrow version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("barrow {}", string());
}
