//! Command helper utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{self, PacfallError, Result};
use crate::resolver::validation::normalize_requests;
use crate::source::community::AurHelperSource;
use crate::source::primary::PacmanSource;
use crate::source::{PackageSource, SourceRegistry};

/// Read a package list: one name per line, `#` starts a comment, blank lines are ignored
pub fn read_package_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        error::config::package_list_failed(path.display().to_string(), e.to_string())
    })?;
    parse_package_list(&content)
}

/// Parse package list content. Names are validated.
pub fn parse_package_list(content: &str) -> Result<Vec<String>> {
    normalize_requests(
        content
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default()),
    )
}

/// Build the batches for a run: one per file, in order, then the positional names.
/// Empty batches are dropped.
pub fn collect_batches(names: &[String], files: &[PathBuf]) -> Result<Vec<Vec<String>>> {
    let mut batches = Vec::new();
    for file in files {
        batches.push(read_package_list(file)?);
    }
    batches.push(normalize_requests(names)?);
    batches.retain(|batch| !batch.is_empty());

    if batches.is_empty() {
        return Err(PacfallError::NoPackagesRequested);
    }
    Ok(batches)
}

/// Both sources as configured
pub fn build_registry(config: &Config) -> SourceRegistry {
    let primary = PacmanSource::new(
        config.primary_command.clone(),
        config.privilege_wrapper.clone(),
        config.primary_lookup_timeout(),
        config.install_timeout(),
    );
    let community = AurHelperSource::new(
        config.community_helper.clone(),
        config.bootstrap_helper,
        config.community_lookup_timeout(),
        config.install_timeout(),
        config.community_query_interval(),
    );
    SourceRegistry::new(
        Box::new(primary),
        Some(Box::new(community) as Box<dyn PackageSource>),
    )
}
