//! Check command: classify names without installing or prompting

use tracing::debug;

use crate::cli::CheckArgs;
use crate::commands::helpers::{build_registry, collect_batches};
use crate::config::Config;
use crate::error::Result;
use crate::resolver::classify;
use crate::ui::summary::print_classification;
use crate::ui::{ConsoleProgressReporter, ProgressReporter};

pub fn run(config: &Config, args: CheckArgs) -> Result<()> {
    let names: Vec<String> = collect_batches(&args.names, &args.files)?
        .into_iter()
        .flatten()
        .collect();

    // Read-only: never build a missing helper
    let config = Config {
        bootstrap_helper: false,
        ..config.clone()
    };
    let mut registry = build_registry(&config);
    let mut reporter = ConsoleProgressReporter::new();
    reporter.batch_started(names.len());
    let classification = classify(&mut registry, &names, &mut reporter);
    debug!("Classified {} package(s)", classification.len());

    print_classification(&classification);
    if !registry.has_community() && !classification.unresolvable.is_empty() {
        println!("Note: the AUR helper was unavailable, so names were only checked against the official repositories");
    }
    Ok(())
}
