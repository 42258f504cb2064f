//! Install command
//!
//! Resolves each batch in order (one per `--file`, then the positional names),
//! prints the summary, and exits non-zero when anything is left unresolved.

use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use tracing::{info, warn};

use crate::cli::InstallArgs;
use crate::commands::helpers::{build_registry, collect_batches};
use crate::config::Config;
use crate::error::{self, PacfallError, Result};
use crate::ledger::RunSummary;
use crate::preflight;
use crate::resolver::{ResolutionMode, Resolver, ResolverOptions, UnattendedPolicy};
use crate::ui::ConsoleProgressReporter;
use crate::ui::chooser::PromptChooser;
use crate::ui::summary::print_summary;

pub fn run(config: &Config, args: InstallArgs) -> Result<()> {
    let batches = collect_batches(&args.names, &args.files)?;
    preflight::check_privilege_wrapper(&config.privilege_wrapper)?;

    let options = resolver_options(config, &args, std::io::stdin().is_terminal())?;
    info!(
        "Starting run: {} batch(es), mode {:?}, scope {:?}",
        batches.len(),
        options.mode,
        options.scope
    );

    let mut resolver = Resolver::new(
        build_registry(config),
        Box::new(PromptChooser),
        Box::new(ConsoleProgressReporter::new()),
        options,
    );
    for batch in &batches {
        resolver.resolve_batch(batch)?;
    }
    let summary = resolver.finish()?;

    print_summary(&summary);
    if let Some(path) = &args.summary_json {
        write_summary_json(&summary, path)?;
    }

    if summary.is_clean() {
        Ok(())
    } else {
        Err(PacfallError::UnresolvedPackages {
            deferred: summary.deferred.len(),
            failed: summary.failed.len(),
        })
    }
}

/// Merge config and flags. Interactive mode needs a terminal on stdin.
fn resolver_options(
    config: &Config,
    args: &InstallArgs,
    stdin_is_terminal: bool,
) -> Result<ResolverOptions> {
    let max_candidates = args.max_candidates.unwrap_or(config.max_candidates);
    if max_candidates == 0 {
        return Err(error::config::invalid(
            "--max-candidates must be greater than zero",
        ));
    }

    let mode = if args.auto_pick {
        ResolutionMode::Unattended(UnattendedPolicy::AutoPickFirst)
    } else if args.unattended {
        ResolutionMode::Unattended(config.unattended_policy)
    } else if !stdin_is_terminal {
        warn!("stdin is not a terminal, running unattended");
        ResolutionMode::Unattended(config.unattended_policy)
    } else {
        ResolutionMode::Interactive
    };

    Ok(ResolverOptions {
        mode,
        scope: args.scope.unwrap_or(config.ledger_scope),
        max_candidates,
    })
}

fn write_summary_json(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json + "\n")
        .map_err(|e| error::fs::write_failed(path.display().to_string(), e.to_string()))
}
