//! Test fixtures: in-memory package sources and a scripted chooser.
//!
//! Unit tests exercise the resolver without pacman or network access. Every
//! fake records the calls it receives so tests can assert on exactly which
//! queries and installs were issued.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{FakeCatalog, FakeSource};
//!
//! let primary = FakeCatalog::new().existing(&["htop"]).installed(&["git"]);
//! let (registry, primary_log, _) = FakeSource::registry(primary, None);
//! // ... run the resolver ...
//! assert_eq!(primary_log.borrow().install_calls, vec![vec!["htop"]]);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use tempfile::TempDir;

use crate::error::Result;
use crate::source::{
    CandidateAlternative, CommandOutcome, ExistenceResult, PackageSource, SourceKind,
    SourceRegistry,
};
use crate::ui::chooser::{Chooser, Selection};

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Contents of a fake package source
#[derive(Debug, Clone)]
pub struct FakeCatalog {
    existing: HashSet<String>,
    installed: HashSet<String>,
    searches: HashMap<String, Vec<String>>,
    failing_installs: HashSet<String>,
    atomic_installs: bool,
    available: bool,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            existing: HashSet::new(),
            installed: HashSet::new(),
            searches: HashMap::new(),
            failing_installs: HashSet::new(),
            atomic_installs: false,
            available: true,
        }
    }
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the catalog knows about
    pub fn existing(mut self, names: &[&str]) -> Self {
        self.existing.extend(names.iter().map(|s| s.to_string()));
        self
    }

    /// Names already present on the system
    pub fn installed(mut self, names: &[&str]) -> Self {
        self.installed.extend(names.iter().map(|s| s.to_string()));
        self
    }

    /// Search results for `term`, in order
    pub fn searchable(mut self, term: &str, hits: &[&str]) -> Self {
        self.searches.insert(
            term.to_string(),
            hits.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Names that exist but fail to install
    pub fn failing(mut self, names: &[&str]) -> Self {
        self.failing_installs
            .extend(names.iter().map(|s| s.to_string()));
        self
    }

    /// A failing name fails the whole install call and nothing is installed
    pub fn atomic(mut self) -> Self {
        self.atomic_installs = true;
        self
    }

    /// The source cannot be used (e.g. helper bootstrap failed)
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// Calls received by a fake source
#[derive(Debug, Default)]
pub struct CallLog {
    pub exists_calls: Vec<String>,
    pub search_calls: Vec<String>,
    pub installed_calls: Vec<String>,
    pub install_calls: Vec<Vec<String>>,
    pub availability_checks: usize,
}

impl CallLog {
    /// Every name passed to any install call
    pub fn installed_names(&self) -> Vec<String> {
        self.install_calls.iter().flatten().cloned().collect()
    }
}

pub type SharedLog = Rc<RefCell<CallLog>>;

pub struct FakeSource {
    kind: SourceKind,
    catalog: FakeCatalog,
    log: SharedLog,
}

impl FakeSource {
    pub fn new(kind: SourceKind, catalog: FakeCatalog) -> (Self, SharedLog) {
        let log = SharedLog::default();
        (
            Self {
                kind,
                catalog,
                log: Rc::clone(&log),
            },
            log,
        )
    }

    /// Registry over fake sources, with a call log per source
    pub fn registry(
        primary: FakeCatalog,
        community: Option<FakeCatalog>,
    ) -> (SourceRegistry, SharedLog, Option<SharedLog>) {
        let (primary, primary_log) = FakeSource::new(SourceKind::Primary, primary);
        let (community, community_log) = match community {
            Some(catalog) => {
                let (source, log) = FakeSource::new(SourceKind::Community, catalog);
                (Some(Box::new(source) as Box<dyn PackageSource>), Some(log))
            }
            None => (None, None),
        };
        (
            SourceRegistry::new(Box::new(primary), community),
            primary_log,
            community_log,
        )
    }
}

impl PackageSource for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn exists(&mut self, name: &str) -> ExistenceResult {
        self.log.borrow_mut().exists_calls.push(name.to_string());
        ExistenceResult::new(name, self.kind, self.catalog.existing.contains(name))
    }

    fn search(&mut self, term: &str) -> Vec<String> {
        self.log.borrow_mut().search_calls.push(term.to_string());
        self.catalog.searches.get(term).cloned().unwrap_or_default()
    }

    fn is_installed(&mut self, name: &str) -> bool {
        self.log.borrow_mut().installed_calls.push(name.to_string());
        self.catalog.installed.contains(name)
    }

    /// Installs every known, non-failing name; succeeds only if all of them made it.
    /// Atomic catalogs install nothing unless every name can be installed.
    fn install(&mut self, names: &[String]) -> CommandOutcome {
        self.log.borrow_mut().install_calls.push(names.to_vec());
        let installable = |name: &String| {
            self.catalog.existing.contains(name) && !self.catalog.failing_installs.contains(name)
        };
        let all_ok = names.iter().all(installable);
        if all_ok || !self.catalog.atomic_installs {
            let ok: Vec<String> = names.iter().filter(|&n| installable(n)).cloned().collect();
            self.catalog.installed.extend(ok);
        }
        if all_ok {
            CommandOutcome::succeeded("")
        } else {
            CommandOutcome::failed(1, "error: failed to commit transaction")
        }
    }

    fn is_available(&mut self) -> bool {
        self.log.borrow_mut().availability_checks += 1;
        self.catalog.available
    }
}

/// Interactions seen by a [`ScriptedChooser`]
#[derive(Debug, Default)]
pub struct ChooserLog {
    pub confirm_calls: Vec<String>,
    pub presented: Vec<(String, Vec<CandidateAlternative>)>,
}

/// Chooser that replays canned answers.
///
/// Once the scripts run out it confirms every search and skips every list.
#[derive(Default)]
pub struct ScriptedChooser {
    confirms: VecDeque<bool>,
    selections: VecDeque<Selection>,
    log: Rc<RefCell<ChooserLog>>,
}

impl ScriptedChooser {
    pub fn new() -> (Self, Rc<RefCell<ChooserLog>>) {
        let chooser = Self::default();
        let log = Rc::clone(&chooser.log);
        (chooser, log)
    }

    pub fn confirming(mut self, answers: &[bool]) -> Self {
        self.confirms.extend(answers);
        self
    }

    pub fn selecting(mut self, selections: &[Selection]) -> Self {
        self.selections.extend(selections);
        self
    }
}

impl Chooser for ScriptedChooser {
    fn confirm_search(&mut self, requested: &str) -> Result<bool> {
        self.log
            .borrow_mut()
            .confirm_calls
            .push(requested.to_string());
        Ok(self.confirms.pop_front().unwrap_or(true))
    }

    fn choose(
        &mut self,
        requested: &str,
        candidates: &[CandidateAlternative],
    ) -> Result<Selection> {
        self.log
            .borrow_mut()
            .presented
            .push((requested.to_string(), candidates.to_vec()));
        Ok(self.selections.pop_front().unwrap_or(Selection::Skip))
    }
}
