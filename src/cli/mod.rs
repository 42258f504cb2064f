//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - check: Check command arguments
//! - search: Search command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod check;
pub mod completions;
pub mod install;
pub mod search;

pub use check::CheckArgs;
pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use search::SearchArgs;

/// pacfall - package installs with alternative-search fallback
///
/// Install package lists from the official repositories and the AUR, searching
/// for substitutes when a name cannot be found.
#[derive(Parser, Debug)]
#[command(
    name = "pacfall",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Package installs with alternative-search fallback for Arch Linux",
    long_about = "Package installs with alternative-search fallback for Arch Linux.\n\n\
                  pacfall installs package lists from the official repositories (pacman) and the \
                  AUR (via an AUR helper). Names that cannot be installed are searched for \
                  substitutes, deferred, and retried once before being reported as failed.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  pacfall install htop vim                    \x1b[90m# Install, prompting for alternatives\x1b[0m\n   \
                  pacfall install -f tools.txt --unattended   \x1b[90m# Never prompt, defer what is missing\x1b[0m\n   \
                  pacfall check -f tools.txt                  \x1b[90m# Classify without installing\x1b[0m\n   \
                  pacfall search burpsuite                    \x1b[90m# List alternatives from both sources\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (defaults to ~/.config/pacfall/config.yaml)
    #[arg(long, short = 'c', global = true, env = "PACFALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install packages, falling back to alternatives
    Install(InstallArgs),

    /// Classify packages without installing anything
    Check(CheckArgs),

    /// List alternatives for a name from both sources
    Search(SearchArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
