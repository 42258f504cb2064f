//! Resolution engine
//!
//! Per requested name:
//!
//! ```text
//! installed already ............................ AlreadyInstalled
//! exists in repo ──► batch install ──► ok ...... InstalledDirect
//!                                  └─► failed ─┐
//! exists in AUR only ─► helper install ─► ok ... InstalledDirect
//!                                     └─► failed ┤
//! exists nowhere ───────────────────────────────┤
//!                                               ▼
//!                                   search alternatives
//!            no candidates / skip ──► Deferred
//!            candidate picked ──► installed already / repo / AUR ──► InstalledViaAlternative
//!                                 otherwise ──► Failed
//! ```
//!
//! Deferred names get exactly one more trip through the alternative search
//! once the batch (or the whole run, see [`LedgerScope`]) is done. Whatever
//! is still unresolved after that fails.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::{ResolutionMode, classify, oracle};
use crate::error::Result;
use crate::ledger::{LedgerScope, OutcomeLedger, ResolutionOutcome, RunSummary};
use crate::source::{CandidateAlternative, SourceKind, SourceRegistry, dedup_preserving_order};
use crate::ui::ProgressReporter;
use crate::ui::chooser::{Chooser, Selection};

/// Knobs fixed for the lifetime of a [`Resolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    pub mode: ResolutionMode,
    pub scope: LedgerScope,
    /// Candidates offered per source
    pub max_candidates: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            mode: ResolutionMode::Interactive,
            scope: LedgerScope::Run,
            max_candidates: 15,
        }
    }
}

pub struct Resolver {
    registry: SourceRegistry,
    chooser: Box<dyn Chooser>,
    reporter: Box<dyn ProgressReporter>,
    options: ResolverOptions,
    ledger: OutcomeLedger,
    summary: RunSummary,
    /// Names from closed batch ledgers; they keep their first outcome for the run
    closed: HashSet<String>,
}

impl Resolver {
    pub fn new(
        registry: SourceRegistry,
        chooser: Box<dyn Chooser>,
        reporter: Box<dyn ProgressReporter>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            registry,
            chooser,
            reporter,
            options,
            ledger: OutcomeLedger::new(),
            summary: RunSummary::default(),
            closed: HashSet::new(),
        }
    }

    /// The ledger currently being filled
    pub fn ledger(&self) -> &OutcomeLedger {
        &self.ledger
    }

    /// Resolve one batch of requested names, in the order given.
    ///
    /// Names already resolved earlier in the run are not reprocessed, whatever
    /// the ledger scope. With [`LedgerScope::Batch`] the deferred-retry pass
    /// runs before this returns.
    ///
    /// # Errors
    ///
    /// Only operator interrupts during a prompt are errors.
    pub fn resolve_batch(&mut self, requests: &[String]) -> Result<()> {
        let pending: Vec<String> = dedup_preserving_order(requests.iter().cloned())
            .into_iter()
            .filter(|name| {
                let seen = self.ledger.contains(name) || self.closed.contains(name);
                if seen {
                    debug!("{} already resolved in this run", name);
                }
                !seen
            })
            .collect();

        if !pending.is_empty() {
            info!("Resolving {} package(s): {}", pending.len(), pending.join(" "));
            self.reporter.batch_started(pending.len());
            let classification = classify(&mut self.registry, &pending, self.reporter.as_mut());

            for name in &classification.already_installed {
                self.settle(name, ResolutionOutcome::AlreadyInstalled);
            }

            let mut needs_search: HashSet<String> =
                classification.unresolvable.iter().cloned().collect();
            needs_search.extend(
                self.install_primary_batch(&classification.installable_from(SourceKind::Primary)),
            );
            for name in classification.installable_from(SourceKind::Community) {
                if !self.install_community_direct(&name) {
                    needs_search.insert(name);
                }
            }

            for name in pending.iter().filter(|name| needs_search.contains(*name)) {
                let outcome = self.search_alternatives(name)?;
                self.settle(name, outcome);
            }
        }

        if self.options.scope == LedgerScope::Batch {
            self.retry_deferred()?;
            let finished = std::mem::take(&mut self.ledger);
            debug!("Batch closed with {} entries", finished.len());
            self.closed
                .extend(finished.entries().map(|(name, _)| name.to_string()));
            self.summary.absorb(&finished);
        }
        Ok(())
    }

    /// Run the end-of-run retry pass (run scope) and return the summary
    ///
    /// # Errors
    ///
    /// Only operator interrupts during a prompt are errors.
    pub fn finish(mut self) -> Result<RunSummary> {
        if self.options.scope == LedgerScope::Run {
            self.retry_deferred()?;
            self.summary = self.ledger.summarize();
        }
        info!(
            "Run finished: {} installed, {} deferred, {} failed",
            self.summary.installed_count,
            self.summary.deferred.len(),
            self.summary.failed.len()
        );
        Ok(self.summary)
    }

    /// One install call for every validated repo name. After a failed batch,
    /// names still missing are installed one at a time when more than one is left.
    /// Returns the names that did not end up installed.
    fn install_primary_batch(&mut self, names: &[String]) -> Vec<String> {
        if names.is_empty() {
            return Vec::new();
        }
        self.reporter.installing(names, SourceKind::Primary);
        let outcome = self.registry.install(names, SourceKind::Primary);
        if outcome.success {
            for name in names {
                self.settle(name, ResolutionOutcome::InstalledDirect);
            }
            return Vec::new();
        }

        warn!(
            "Batch install of {} package(s) failed (exit {:?}{}), checking each",
            names.len(),
            outcome.exit_code,
            if outcome.timed_out { ", timed out" } else { "" }
        );
        debug!("Batch install output:\n{}", outcome.combined_output());

        let mut missing = Vec::new();
        for name in names {
            if oracle::is_installed(&mut self.registry, name) {
                self.settle(name, ResolutionOutcome::InstalledDirect);
            } else {
                missing.push(name.clone());
            }
        }
        if missing.len() < 2 {
            return missing;
        }

        // pacman transactions are all-or-nothing: one bad name sinks the rest
        let mut failed = Vec::new();
        for name in missing {
            let single = [name.clone()];
            self.reporter.installing(&single, SourceKind::Primary);
            if self.registry.install(&single, SourceKind::Primary).success {
                self.settle(&name, ResolutionOutcome::InstalledDirect);
            } else {
                failed.push(name);
            }
        }
        failed
    }

    fn install_community_direct(&mut self, name: &str) -> bool {
        let names = [name.to_string()];
        self.reporter.installing(&names, SourceKind::Community);
        let outcome = self.registry.install(&names, SourceKind::Community);
        if outcome.success {
            self.settle(name, ResolutionOutcome::InstalledDirect);
            return true;
        }
        warn!("AUR install of {} failed (exit {:?})", name, outcome.exit_code);
        debug!("AUR install output:\n{}", outcome.combined_output());
        false
    }

    /// Look for a substitute for `requested`. Never returns an installed-direct outcome.
    fn search_alternatives(&mut self, requested: &str) -> Result<ResolutionOutcome> {
        if self.options.mode.skips_alternatives() {
            info!("{}: unattended, leaving for manual follow-up", requested);
            return Ok(ResolutionOutcome::Deferred);
        }
        if self.options.mode.is_interactive() && !self.chooser.confirm_search(requested)? {
            info!("{}: operator declined alternative search", requested);
            return Ok(ResolutionOutcome::Deferred);
        }

        let candidates = self
            .registry
            .candidates(requested, self.options.max_candidates);
        if candidates.is_empty() {
            info!("{}: no alternatives found", requested);
            return Ok(ResolutionOutcome::Deferred);
        }
        debug!(
            "{}: {} candidate(s): {}",
            requested,
            candidates.len(),
            candidates
                .iter()
                .map(|c| format!("{} [{}]", c.name, c.source))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let selection = match self.options.mode {
            ResolutionMode::Interactive => self.chooser.choose(requested, &candidates)?,
            ResolutionMode::Unattended(_) => Selection::Pick(0),
        };
        let chosen = match selection {
            Selection::Pick(index) => candidates.get(index).cloned(),
            Selection::Skip => None,
        };
        match chosen {
            Some(candidate) => Ok(self.install_alternative(requested, candidate)),
            None => {
                info!("{}: no alternative selected", requested);
                Ok(ResolutionOutcome::Deferred)
            }
        }
    }

    /// Re-validate the chosen substitute against both sources and install it
    fn install_alternative(
        &mut self,
        requested: &str,
        candidate: CandidateAlternative,
    ) -> ResolutionOutcome {
        info!(
            "{}: trying alternative {} [{}]",
            requested, candidate.name, candidate.source
        );
        let name = candidate.name.clone();

        if oracle::is_installed(&mut self.registry, &name) {
            return ResolutionOutcome::InstalledViaAlternative {
                selected: candidate,
            };
        }

        for source in [SourceKind::Primary, SourceKind::Community] {
            if !self.registry.exists(&name, source) {
                continue;
            }
            let names = [name.clone()];
            self.reporter.installing(&names, source);
            if self.registry.install(&names, source).success {
                return ResolutionOutcome::InstalledViaAlternative {
                    selected: CandidateAlternative::new(name, source),
                };
            }
            warn!("{}: installing alternative {} from {} failed", requested, name, source);
        }
        ResolutionOutcome::Failed
    }

    /// Give every deferred name one more chance; still unresolved means failed
    fn retry_deferred(&mut self) -> Result<()> {
        if self.options.mode.skips_alternatives() {
            return Ok(());
        }
        let deferred = self.ledger.deferred();
        if deferred.is_empty() {
            return Ok(());
        }
        info!("Retrying {} deferred package(s)", deferred.len());
        self.reporter.retry_started(deferred.len());
        for name in deferred {
            let outcome = match self.search_alternatives(&name)? {
                ResolutionOutcome::Deferred => ResolutionOutcome::Failed,
                outcome => outcome,
            };
            self.settle(&name, outcome);
        }
        Ok(())
    }

    fn settle(&mut self, name: &str, outcome: ResolutionOutcome) {
        if self.ledger.record(name, outcome.clone()) {
            info!("{}: {}", name, outcome);
            self.reporter.outcome(name, &outcome);
        } else {
            debug!("{}: ignoring {} for an already final outcome", name, outcome);
        }
    }
}
