use clap::Parser;
use std::path::PathBuf;

/// Arguments for the check command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Check a package list:\n    pacfall check -f tools.txt\n\n\
                   Check names:\n    pacfall check htop burpsuite")]
pub struct CheckArgs {
    /// Package names
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Package list file, one name per line
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    pub files: Vec<PathBuf>,
}
