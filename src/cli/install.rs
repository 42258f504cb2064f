use clap::Parser;
use std::path::PathBuf;

use crate::ledger::LedgerScope;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install names, prompting for alternatives:\n    pacfall install htop nmap burpsuite\n\n\
                   Install package lists, one batch per file:\n    pacfall install -f base.txt -f tools.txt\n\n\
                   Unattended, substituting the first alternative:\n    pacfall install -f tools.txt --auto-pick\n\n\
                   Machine-readable summary:\n    pacfall install -f tools.txt --unattended --summary-json out.json\n\n\
                   Exit status is 2 when any package is left deferred or failed.")]
pub struct InstallArgs {
    /// Package names (one batch)
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Package list file, one name per line (each file is its own batch)
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Never prompt; leave unresolved names deferred
    #[arg(long, short = 'y')]
    pub unattended: bool,

    /// Never prompt; install the first alternative found (implies --unattended)
    #[arg(long)]
    pub auto_pick: bool,

    /// Whether deferred names are retried per batch or once per run
    #[arg(long, value_enum, value_name = "SCOPE")]
    pub scope: Option<LedgerScope>,

    /// Alternatives offered per source
    #[arg(long, value_name = "N")]
    pub max_candidates: Option<usize>,

    /// Write the run summary as JSON
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}
