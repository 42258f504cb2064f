//! The AUR through a helper (`yay`, `paru`)
//!
//! Lookups go over the network, so every query is throttled and bounded by
//! the community lookup timeout. The helper is located lazily on first use
//! and bootstrapped if missing; after a failed bootstrap the source reports
//! itself unavailable for the rest of the run.

use std::time::Duration;

use tracing::{debug, warn};

use super::bootstrap;
use super::command::{self, CommandSpec};
use super::throttle::Throttle;
use super::{CommandOutcome, ExistenceResult, PackageSource, SourceKind, dedup_preserving_order};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HelperState {
    Unknown,
    Ready,
    Unavailable,
}

/// The network-backed, user-contributed source
#[derive(Debug)]
pub struct AurHelperSource {
    helper: String,
    bootstrap: bool,
    lookup_timeout: Duration,
    install_timeout: Duration,
    throttle: Throttle,
    state: HelperState,
}

impl AurHelperSource {
    pub fn new(
        helper: impl Into<String>,
        bootstrap: bool,
        lookup_timeout: Duration,
        install_timeout: Duration,
        query_interval: Duration,
    ) -> Self {
        Self {
            helper: helper.into(),
            bootstrap,
            lookup_timeout,
            install_timeout,
            throttle: Throttle::new(query_interval),
            state: HelperState::Unknown,
        }
    }

    fn helper_on_path(&self) -> bool {
        which::which(&self.helper).is_ok()
    }

    fn network_query(&mut self, args: &[&str]) -> CommandOutcome {
        self.throttle.wait();
        command::run(&CommandSpec::new(
            self.helper.clone(),
            args.iter().copied(),
            self.lookup_timeout,
        ))
    }
}

impl PackageSource for AurHelperSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Community
    }

    fn is_available(&mut self) -> bool {
        if self.state == HelperState::Unknown {
            self.state = if self.helper_on_path() {
                HelperState::Ready
            } else if !self.bootstrap {
                warn!("AUR helper '{}' not found and bootstrap is disabled", self.helper);
                HelperState::Unavailable
            } else {
                match bootstrap::bootstrap_helper(&self.helper, self.install_timeout) {
                    Ok(()) => HelperState::Ready,
                    Err(e) => {
                        warn!("{}", e);
                        HelperState::Unavailable
                    }
                }
            };
        }
        self.state == HelperState::Ready
    }

    fn exists(&mut self, name: &str) -> ExistenceResult {
        let outcome = self.network_query(&["-Si", "--aur", name]);
        ExistenceResult::new(name, SourceKind::Community, outcome.success)
    }

    fn search(&mut self, term: &str) -> Vec<String> {
        let outcome = self.network_query(&["-Ss", "--aur", term]);
        if !outcome.success {
            debug!("AUR search for '{}' returned nothing usable", term);
            return Vec::new();
        }
        parse_search_records(&outcome.stdout)
    }

    fn is_installed(&mut self, name: &str) -> bool {
        if self.state == HelperState::Unavailable || !self.helper_on_path() {
            return false;
        }
        command::run(&CommandSpec::new(
            self.helper.clone(),
            ["-Q", name],
            self.lookup_timeout,
        ))
        .success
    }

    fn install(&mut self, names: &[String]) -> CommandOutcome {
        // The helper is driven one package per call
        let mut combined = CommandOutcome::succeeded("");
        for name in names {
            let outcome = command::run(
                &CommandSpec::new(
                    self.helper.clone(),
                    ["-S", "--needed", "--noconfirm", name.as_str()],
                    self.install_timeout,
                )
                .interactive(),
            );
            combined.stdout.push_str(&outcome.stdout);
            combined.stderr.push_str(&outcome.stderr);
            if !outcome.success {
                combined.success = false;
                combined.exit_code = outcome.exit_code;
                combined.timed_out |= outcome.timed_out;
            }
        }
        combined
    }
}

/// Extract package names from helper search output.
///
/// Each record starts with an unindented header such as
/// `aur/burpsuite 2024.1-1 (+52 1.20) (Installed)` followed by indented
/// description lines. The name is the header's first token with its
/// repository prefix removed.
pub fn parse_search_records(output: &str) -> Vec<String> {
    dedup_preserving_order(
        output
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with(char::is_whitespace))
            .filter_map(|line| line.split_whitespace().next())
            .map(|token| token.rsplit('/').next().unwrap_or(token))
            .filter(|name| !name.is_empty())
            .map(String::from),
    )
}
