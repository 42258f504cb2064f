//! Search command: list the alternatives the resolver would offer

use console::Style;

use crate::cli::SearchArgs;
use crate::commands::helpers::build_registry;
use crate::config::Config;
use crate::error::{self, Result};
use crate::resolver::validation::is_valid_package_name;
use crate::source::CandidateAlternative;

pub fn run(config: &Config, args: SearchArgs) -> Result<()> {
    if !is_valid_package_name(&args.term) {
        return Err(error::PacfallError::InvalidPackageName { name: args.term });
    }
    let max_candidates = args.max_candidates.unwrap_or(config.max_candidates);
    if max_candidates == 0 {
        return Err(error::config::invalid(
            "--max-candidates must be greater than zero",
        ));
    }

    let config = Config {
        bootstrap_helper: false,
        ..config.clone()
    };
    let mut registry = build_registry(&config);
    let candidates = registry.candidates(&args.term, max_candidates);
    println!("{}", render_search(&args.term, &candidates));
    Ok(())
}

fn render_search(term: &str, candidates: &[CandidateAlternative]) -> String {
    if candidates.is_empty() {
        return format!("No alternatives found for {term}");
    }
    candidates
        .iter()
        .enumerate()
        .map(|(position, candidate)| {
            format!(
                "{:>3}) {} [{}]",
                position + 1,
                Style::new().bold().apply_to(&candidate.name),
                candidate.source
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
