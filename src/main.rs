use std::process::ExitCode;
use std::sync::Arc;

use barrow::cli::{Cli, Command};
use barrow::commands;
use barrow::logging::{self, Logger};
use clap::Parser;

fn main() -> ExitCode {
    let args = Cli::parse();
    let command = args.command_or_default();
    if command == Command::Version {
        commands::version::run();
        return ExitCode::SUCCESS;
    }

    logging::init_subscriber(args.verbose, command.name());
    let log = Arc::new(Logger::new(command.name()));

    let result = match command {
        Command::Install => commands::install::run(&args.global, &log),
        Command::Check => commands::check::run(&args.global, &log),
        Command::Version => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
