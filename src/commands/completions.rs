//! Shell completions command

use clap::CommandFactory;
use clap::ValueEnum;

use crate::cli::CompletionsArgs;
use crate::error::{self, Result};

/// Generate shell completions
pub fn run(args: CompletionsArgs) -> Result<()> {
    let shell = parse_shell(&args.shell)?;
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "pacfall", &mut std::io::stdout().lock());
    Ok(())
}

fn parse_shell(name: &str) -> Result<clap_complete::Shell> {
    match name.to_lowercase().as_str() {
        "pwsh" => Ok(clap_complete::Shell::PowerShell),
        other => clap_complete::Shell::from_str(other, true).map_err(|_| {
            error::config::invalid(format!(
                "unknown shell '{name}' (supported: bash, elvish, fish, powershell, zsh)"
            ))
        }),
    }
}
