//! Command-line entry point for `genes`.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use genes_cli::cli::{Cli, Command};
use genes_cli::commands;
use genes_cli::logging::{self, Logger};
use genes_cli::platform::Platform;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let log_name = args.command.log_name();
    logging::init_subscriber(args.verbose, log_name);

    // Detection runs external programs; do it once before any command reads it.
    let _ = Platform::current();
    let log = Arc::new(Logger::new(log_name));

    match args.command {
        Command::Install(opts) => commands::install::run(&args.global, &opts, &log),
        Command::Platform(opts) => commands::platform::run(&opts),
        Command::User(opts) => commands::user::run(&args.global, &opts, &log),
        Command::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
