//! Outcome ledger
//!
//! Keyed record of every requested package's disposition for one run (or one
//! batch, depending on [`LedgerScope`]). Entries keep insertion order, and the
//! deferred set keeps the order in which names were deferred so the retry
//! pass revisits them in that order.
//!
//! The ledger is monotonic: a name that reached an installed outcome or
//! `Failed` is never overwritten. Only `Deferred` may move on.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::CandidateAlternative;

/// Terminal disposition of one requested package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    AlreadyInstalled,
    InstalledDirect,
    InstalledViaAlternative { selected: CandidateAlternative },
    Deferred,
    Failed,
}

impl ResolutionOutcome {
    /// Whether the package (or its substitute) is on the system
    pub fn is_installed(&self) -> bool {
        matches!(
            self,
            ResolutionOutcome::AlreadyInstalled
                | ResolutionOutcome::InstalledDirect
                | ResolutionOutcome::InstalledViaAlternative { .. }
        )
    }

    /// Whether no later stage may change this outcome
    pub fn is_final(&self) -> bool {
        !matches!(self, ResolutionOutcome::Deferred)
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionOutcome::AlreadyInstalled => write!(f, "already installed"),
            ResolutionOutcome::InstalledDirect => write!(f, "installed"),
            ResolutionOutcome::InstalledViaAlternative { selected } => {
                write!(f, "installed as {} [{}]", selected.name, selected.source)
            }
            ResolutionOutcome::Deferred => write!(f, "deferred"),
            ResolutionOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Lifetime of a ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerScope {
    /// One ledger for the whole run; deferred names are retried once at the end
    #[default]
    Run,
    /// A fresh ledger per batch; each batch is retried and summarized on its own
    Batch,
}

#[derive(Debug, Default)]
pub struct OutcomeLedger {
    entries: Vec<(String, ResolutionOutcome)>,
    index: HashMap<String, usize>,
    deferred_order: Vec<String>,
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome for `name`.
    ///
    /// Returns `false` (and leaves the ledger untouched) when `name` already
    /// holds a final outcome.
    pub fn record(&mut self, name: &str, outcome: ResolutionOutcome) -> bool {
        let deferred = outcome == ResolutionOutcome::Deferred;
        match self.index.get(name) {
            Some(&position) => {
                let current = &mut self.entries[position].1;
                if current.is_final() {
                    return false;
                }
                *current = outcome;
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), outcome));
            }
        }
        if deferred {
            self.deferred_order.retain(|n| n != name);
            self.deferred_order.push(name.to_string());
        }
        true
    }

    pub fn get(&self, name: &str) -> Option<&ResolutionOutcome> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names currently deferred, in the order they were deferred
    pub fn deferred(&self) -> Vec<String> {
        self.deferred_order
            .iter()
            .filter(|name| self.get(name) == Some(&ResolutionOutcome::Deferred))
            .cloned()
            .collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ResolutionOutcome)> {
        self.entries
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn summarize(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        summary.absorb(self);
        summary
    }
}

/// Aggregate view of one or more ledgers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Packages present at the end: already installed, installed, or substituted
    pub installed_count: usize,
    pub already_installed: Vec<String>,
    pub deferred: Vec<String>,
    pub failed: Vec<String>,
    pub outcomes: Vec<OutcomeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeEntry {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ResolutionOutcome,
}

impl RunSummary {
    /// Fold a ledger's entries into this summary
    pub fn absorb(&mut self, ledger: &OutcomeLedger) {
        for (name, outcome) in ledger.entries() {
            if outcome.is_installed() {
                self.installed_count += 1;
            }
            match outcome {
                ResolutionOutcome::AlreadyInstalled => self.already_installed.push(name.to_string()),
                ResolutionOutcome::Failed => self.failed.push(name.to_string()),
                _ => {}
            }
            self.outcomes.push(OutcomeEntry {
                name: name.to_string(),
                outcome: outcome.clone(),
            });
        }
        self.deferred.extend(ledger.deferred());
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether every requested name ended up installed
    pub fn is_clean(&self) -> bool {
        self.deferred.is_empty() && self.failed.is_empty()
    }

    /// Substitutions made, as (requested, chosen) pairs
    pub fn substitutions(&self) -> impl Iterator<Item = (&str, &CandidateAlternative)> {
        self.outcomes.iter().filter_map(|entry| match &entry.outcome {
            ResolutionOutcome::InstalledViaAlternative { selected } => {
                Some((entry.name.as_str(), selected))
            }
            _ => None,
        })
    }
}
