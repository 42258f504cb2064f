//! Configuration file handling for pacfall
//!
//! `config.yaml` is looked up at `--config`, then `$PACFALL_CONFIG`, then
//! `<config dir>/pacfall/config.yaml`. Every key is optional; a missing
//! default file means built-in defaults. Command-line flags are applied on
//! top by the command layer.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};
use crate::ledger::LedgerScope;
use crate::resolver::UnattendedPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Command prefixed to installs that need root (`sudo`, `doas`, ...)
    pub privilege_wrapper: String,

    /// Official repository tool
    pub primary_command: String,

    /// AUR helper binary
    pub community_helper: String,

    /// Build the helper from the AUR when it is missing
    pub bootstrap_helper: bool,

    pub lookup_timeout_primary_secs: u64,
    pub lookup_timeout_community_secs: u64,
    pub install_timeout_secs: u64,

    /// Minimum spacing between AUR network queries
    pub community_query_interval_ms: u64,

    /// Alternatives offered per source
    pub max_candidates: usize,

    pub unattended_policy: UnattendedPolicy,
    pub ledger_scope: LedgerScope,

    /// Append-only run log; defaults to `<data dir>/pacfall/pacfall.log`
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            privilege_wrapper: "sudo".to_string(),
            primary_command: "pacman".to_string(),
            community_helper: "yay".to_string(),
            bootstrap_helper: true,
            lookup_timeout_primary_secs: 5,
            lookup_timeout_community_secs: 10,
            install_timeout_secs: 1800,
            community_query_interval_ms: 250,
            max_candidates: 15,
            unattended_policy: UnattendedPolicy::Defer,
            ledger_scope: LedgerScope::Run,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path (flag or `PACFALL_CONFIG`) must exist. The default
    /// location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(error::config::not_found(path.display().to_string()));
                }
                Self::from_file(path)?
            }
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| error::config::read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_yaml(&content)
            .map_err(|e| error::config::parse_failed(path.display().to_string(), e.to_string()))
    }

    /// Parse configuration from a YAML string. An empty document is the default config.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    pub fn validate(&self) -> Result<()> {
        let non_zero = [
            ("lookup_timeout_primary_secs", self.lookup_timeout_primary_secs),
            ("lookup_timeout_community_secs", self.lookup_timeout_community_secs),
            ("install_timeout_secs", self.install_timeout_secs),
            ("max_candidates", self.max_candidates as u64),
        ];
        for (key, value) in non_zero {
            if value == 0 {
                return Err(error::config::invalid(format!(
                    "{key} must be greater than zero"
                )));
            }
        }
        for (key, value) in [
            ("privilege_wrapper", &self.privilege_wrapper),
            ("primary_command", &self.primary_command),
            ("community_helper", &self.community_helper),
        ] {
            if value.trim().is_empty() {
                return Err(error::config::invalid(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn primary_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_primary_secs)
    }

    pub fn community_lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_community_secs)
    }

    pub fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs)
    }

    pub fn community_query_interval(&self) -> Duration {
        Duration::from_millis(self.community_query_interval_ms)
    }

    /// Run log location, if one can be determined
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("pacfall").join("pacfall.log")))
    }
}

/// `<config dir>/pacfall/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pacfall").join("config.yaml"))
}
