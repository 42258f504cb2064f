//! pacfall - package installs with alternative-search fallback
//!
//! Installs package lists on Arch Linux from the official repositories
//! (pacman) and the AUR (through an AUR helper). Names that cannot be
//! installed are searched for substitutes, deferred, and retried once before
//! they are reported as failed.

use clap::Parser;
use miette::Diagnostic;

mod cli;
mod commands;
mod config;
mod error;
mod git;
mod ledger;
mod logging;
mod preflight;
mod resolver;
mod source;
#[cfg(test)]
mod test_fixtures;
mod ui;

use cli::{Cli, Commands};
use config::Config;
use error::{PacfallError, Result};

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            logging::init(cli.verbose, None);
            commands::version::run()
        }
        Commands::Completions(args) => {
            logging::init(cli.verbose, None);
            commands::completions::run(args)
        }
        command => {
            let config = Config::load(cli.config.as_deref())?;
            logging::init(cli.verbose, config.log_path().as_deref());
            match command {
                Commands::Install(args) => commands::install::run(&config, args),
                Commands::Check(args) => commands::check::run(&config, args),
                Commands::Search(args) => commands::search::run(&config, args),
                Commands::Version | Commands::Completions(_) => Ok(()),
            }
        }
    }
}

fn report(err: &PacfallError) {
    eprintln!("Error: {}", err);
    if let Some(help) = err.help() {
        eprintln!("  help: {}", help);
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        report(&e);
        std::process::exit(e.exit_code());
    }
}
