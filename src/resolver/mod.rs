//! Package resolution
//!
//! This module handles:
//! - Classifying requested names into already installed, installable and
//!   unresolvable buckets ([`classify`])
//! - Driving installs and the alternative-search fallback ([`engine::Resolver`])
//! - Installed-state checks ([`oracle`]) and request validation ([`validation`])

pub mod engine;
pub mod oracle;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::source::{SourceKind, SourceRegistry, dedup_preserving_order};
use crate::ui::ProgressReporter;

pub use engine::{Resolver, ResolverOptions};

/// What to do with unresolved names when nobody is at the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UnattendedPolicy {
    /// Never substitute; leave unresolved names deferred for manual follow-up
    #[default]
    Defer,
    /// Install the first alternative found
    AutoPickFirst,
}

/// How operator decisions are made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    Interactive,
    Unattended(UnattendedPolicy),
}

impl ResolutionMode {
    pub fn is_interactive(&self) -> bool {
        matches!(self, ResolutionMode::Interactive)
    }

    /// Whether alternative search is skipped outright
    pub fn skips_alternatives(&self) -> bool {
        matches!(self, ResolutionMode::Unattended(UnattendedPolicy::Defer))
    }
}

/// Where a name can be installed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installable {
    pub name: String,
    pub source: SourceKind,
}

/// The three buckets a batch sorts into before anything is installed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub already_installed: Vec<String>,
    pub installable: Vec<Installable>,
    pub unresolvable: Vec<String>,
}

impl Classification {
    /// Installable names from one source, in request order
    pub fn installable_from(&self, source: SourceKind) -> Vec<String> {
        self.installable
            .iter()
            .filter(|entry| entry.source == source)
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.already_installed.len() + self.installable.len() + self.unresolvable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sort `names` into buckets without installing anything.
///
/// Duplicates are classified once. Primary is preferred over Community when a
/// name exists in both.
pub fn classify(
    registry: &mut SourceRegistry,
    names: &[String],
    reporter: &mut dyn ProgressReporter,
) -> Classification {
    let mut classification = Classification::default();
    for name in dedup_preserving_order(names.iter().cloned()) {
        reporter.checking(&name);
        if oracle::is_installed(registry, &name) {
            classification.already_installed.push(name);
        } else if registry.exists(&name, SourceKind::Primary) {
            classification.installable.push(Installable {
                name,
                source: SourceKind::Primary,
            });
        } else if registry.exists(&name, SourceKind::Community) {
            classification.installable.push(Installable {
                name,
                source: SourceKind::Community,
            });
        } else {
            classification.unresolvable.push(name);
        }
    }
    reporter.checks_finished();
    classification
}
