//! UI/Progress presentation layer
//!
//! This module handles:
//! - Per-package progress lines while a batch resolves
//! - The operator prompts used during alternative search ([`chooser`])
//! - Rendering of the end-of-run report ([`summary`])
//!
//! The resolver reports through the [`ProgressReporter`] trait so tests and
//! quiet runs can swap in [`SilentProgressReporter`].

pub mod chooser;
pub mod summary;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ledger::ResolutionOutcome;
use crate::source::SourceKind;

/// Progress reporter for a resolution run
pub trait ProgressReporter {
    /// A batch of `total` distinct names is about to be classified
    fn batch_started(&mut self, total: usize);

    /// `name` is being checked against the installed records and both sources
    fn checking(&mut self, name: &str);

    /// Classification of the current batch is done
    fn checks_finished(&mut self);

    /// An install call is about to run
    fn installing(&mut self, names: &[String], source: SourceKind);

    /// `name` reached an outcome
    fn outcome(&mut self, name: &str, outcome: &ResolutionOutcome);

    /// The deferred-retry pass starts with `count` names
    fn retry_started(&mut self, count: usize);
}

/// Console reporter: a progress bar while checking, one line per outcome
#[derive(Default)]
pub struct ConsoleProgressReporter {
    check_pb: Option<ProgressBar>,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn batch_started(&mut self, total: usize) {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} checking {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        self.check_pb = Some(pb);
    }

    fn checking(&mut self, name: &str) {
        if let Some(ref pb) = self.check_pb {
            pb.set_message(name.to_string());
            pb.inc(1);
        }
    }

    fn checks_finished(&mut self) {
        if let Some(pb) = self.check_pb.take() {
            pb.finish_and_clear();
        }
    }

    fn installing(&mut self, names: &[String], source: SourceKind) {
        println!(
            "{} {} [{}]",
            Style::new().cyan().bold().apply_to("::"),
            Style::new().bold().apply_to(format!("Installing {}", names.join(" "))),
            source
        );
    }

    fn outcome(&mut self, name: &str, outcome: &ResolutionOutcome) {
        println!("   {}", describe_outcome(name, outcome));
    }

    fn retry_started(&mut self, count: usize) {
        println!(
            "\n{} Retrying {} deferred package(s)",
            Style::new().yellow().bold().apply_to("::"),
            count
        );
    }
}

/// One styled line per outcome
pub fn describe_outcome(name: &str, outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::AlreadyInstalled => format!(
            "{} {} (already installed)",
            Style::new().green().apply_to("✓"),
            name
        ),
        ResolutionOutcome::InstalledDirect => {
            format!("{} {} installed", Style::new().green().apply_to("✓"), name)
        }
        ResolutionOutcome::InstalledViaAlternative { selected } => format!(
            "{} {} installed as {} [{}]",
            Style::new().green().apply_to("✓"),
            name,
            Style::new().bold().apply_to(&selected.name),
            selected.source
        ),
        ResolutionOutcome::Deferred => format!(
            "{} {} deferred",
            Style::new().yellow().apply_to("…"),
            name
        ),
        ResolutionOutcome::Failed => {
            format!("{} {} failed", Style::new().red().apply_to("✗"), name)
        }
    }
}

/// No-op reporter for quiet runs and tests
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn batch_started(&mut self, _total: usize) {}

    fn checking(&mut self, _name: &str) {}

    fn checks_finished(&mut self) {}

    fn installing(&mut self, _names: &[String], _source: SourceKind) {}

    fn outcome(&mut self, _name: &str, _outcome: &ResolutionOutcome) {}

    fn retry_started(&mut self, _count: usize) {}
}
