//! Package sources
//!
//! Two independently queried catalogs sit behind the [`PackageSource`] trait:
//! - [`primary::PacmanSource`]: the official repositories via `pacman`
//!   (local sync database, fast)
//! - [`community::AurHelperSource`]: the AUR via a helper such as `yay`
//!   (network backed, rate limited, may need bootstrapping)
//!
//! [`SourceRegistry`] owns both and hides the community source once it has
//! proven unusable for the rest of the run.

pub mod bootstrap;
pub mod command;
pub mod community;
pub mod primary;
pub mod throttle;

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

pub use command::CommandOutcome;

/// Which catalog a name was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Primary,
    Community,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Primary => write!(f, "repo"),
            SourceKind::Community => write!(f, "aur"),
        }
    }
}

/// Result of a single existence query. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceResult {
    pub name: String,
    pub source: SourceKind,
    pub exists: bool,
    pub checked_at: DateTime<Utc>,
}

impl ExistenceResult {
    pub fn new(name: impl Into<String>, source: SourceKind, exists: bool) -> Self {
        Self {
            name: name.into(),
            source,
            exists,
            checked_at: Utc::now(),
        }
    }
}

/// A search hit offered as a substitute for a requested name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateAlternative {
    pub name: String,
    pub source: SourceKind,
}

impl CandidateAlternative {
    pub fn new(name: impl Into<String>, source: SourceKind) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// One package catalog
///
/// Every method is infallible: timeouts, missing binaries and non-zero exits
/// collapse into a negative answer so a slow or broken source degrades to
/// "try the next avenue" instead of aborting the batch.
pub trait PackageSource {
    fn kind(&self) -> SourceKind;

    /// Whether the catalog knows `name`
    fn exists(&mut self, name: &str) -> ExistenceResult;

    /// Names matching `term`, in the catalog's order, de-duplicated
    fn search(&mut self, term: &str) -> Vec<String>;

    /// Whether `name` is present in this source's installed-package records
    fn is_installed(&mut self, name: &str) -> bool;

    /// Install `names`. Sources without a batch form install one at a time.
    fn install(&mut self, names: &[String]) -> CommandOutcome;

    /// Whether the source can be used at all. May perform a one-time bootstrap.
    fn is_available(&mut self) -> bool {
        true
    }
}

/// Owns the primary and (optional) community sources for one run
pub struct SourceRegistry {
    primary: Box<dyn PackageSource>,
    community: Option<Box<dyn PackageSource>>,
}

impl SourceRegistry {
    pub fn new(
        primary: Box<dyn PackageSource>,
        community: Option<Box<dyn PackageSource>>,
    ) -> Self {
        Self { primary, community }
    }

    /// Whether community operations are still enabled
    pub fn has_community(&self) -> bool {
        self.community.is_some()
    }

    /// Existence check against one source. A disabled source answers `false`.
    pub fn exists(&mut self, name: &str, kind: SourceKind) -> bool {
        let result = match self.source_mut(kind) {
            Some(source) => source.exists(name),
            None => return false,
        };
        debug!(
            "exists({}, {}) = {} at {}",
            result.name, result.source, result.exists, result.checked_at
        );
        result.exists
    }

    pub fn search(&mut self, term: &str, kind: SourceKind) -> Vec<String> {
        match self.source_mut(kind) {
            Some(source) => source.search(term),
            None => Vec::new(),
        }
    }

    /// Installed check against one source's local records.
    ///
    /// Never triggers a helper bootstrap: a helper that is not there yet has
    /// no installed records to consult.
    pub fn is_installed(&mut self, name: &str, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Primary => self.primary.is_installed(name),
            SourceKind::Community => self
                .community
                .as_mut()
                .is_some_and(|source| source.is_installed(name)),
        }
    }

    pub fn install(&mut self, names: &[String], kind: SourceKind) -> CommandOutcome {
        match self.source_mut(kind) {
            Some(source) => {
                debug!("Installing {} from {}", names.join(" "), source.kind());
                source.install(names)
            }
            None => CommandOutcome::failed(-1, format!("{kind} source is disabled")),
        }
    }

    /// Alternatives for `requested`: primary hits first, then community hits,
    /// each in search order, at most `per_source` from each. The requested
    /// name itself is never offered.
    pub fn candidates(&mut self, requested: &str, per_source: usize) -> Vec<CandidateAlternative> {
        let mut candidates = Vec::new();
        for kind in [SourceKind::Primary, SourceKind::Community] {
            candidates.extend(
                self.search(requested, kind)
                    .into_iter()
                    .filter(|name| name != requested)
                    .take(per_source)
                    .map(|name| CandidateAlternative::new(name, kind)),
            );
        }
        candidates
    }

    fn source_mut(&mut self, kind: SourceKind) -> Option<&mut (dyn PackageSource + 'static)> {
        match kind {
            SourceKind::Primary => Some(self.primary.as_mut()),
            SourceKind::Community => {
                let available = self
                    .community
                    .as_mut()
                    .is_some_and(|source| source.is_available());
                if !available {
                    if self.community.take().is_some() {
                        warn!("Community source unavailable, continuing with official repositories only");
                    }
                    return None;
                }
                self.community.as_deref_mut()
            }
        }
    }
}

/// Drop repeated names, keeping the first occurrence
pub fn dedup_preserving_order<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
