//! Common test utilities for pacfall integration tests
//!
//! [`FakeSystem`] builds a throwaway "Arch system" in a temp directory: shell
//! script stand-ins for `pacman` and the AUR helper, backed by marker files.
//!
//! ```text
//! state/repo/<name>         known to the official repositories
//! state/aur/<name>          known to the AUR
//! state/installed/<name>    installed
//! state/broken/<name>       known, but the install fails
//! state/slow/<name>         existence check hangs
//! state/repo-search/<term>  `pacman -Ssq <term>` output
//! state/aur-search/<term>   helper search output
//! state/install.log         "<source> <name>" per installed package
//! ```

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

const FAKE_PACMAN: &str = r#"#!/bin/sh
STATE='@STATE@'
op="$1"
shift
case "$op" in
  -Q)
    [ -e "$STATE/installed/$1" ] ;;
  -Si)
    [ -e "$STATE/slow/$1" ] && exec sleep 30
    [ -e "$STATE/repo/$1" ] ;;
  -Ssq)
    [ -f "$STATE/repo-search/$1" ] || exit 1
    cat "$STATE/repo-search/$1" ;;
  -S)
    shift 2
    for name in "$@"; do
      if [ ! -e "$STATE/repo/$name" ] || [ -e "$STATE/broken/$name" ]; then
        echo "error: failed to prepare transaction ($name)" >&2
        exit 1
      fi
    done
    for name in "$@"; do
      : > "$STATE/installed/$name"
      echo "repo $name" >> "$STATE/install.log"
    done ;;
  *)
    exit 2 ;;
esac
"#;

const FAKE_HELPER: &str = r#"#!/bin/sh
STATE='@STATE@'
case "$1" in
  -Si)
    [ -e "$STATE/aur/$3" ] ;;
  -Ss)
    [ -f "$STATE/aur-search/$3" ] || exit 1
    cat "$STATE/aur-search/$3" ;;
  -Q)
    [ -e "$STATE/installed/$2" ] ;;
  -S)
    name="$4"
    if [ -e "$STATE/aur/$name" ] && [ ! -e "$STATE/broken/$name" ]; then
      : > "$STATE/installed/$name"
      echo "aur $name" >> "$STATE/install.log"
    else
      echo "error: could not find all required packages: $name" >&2
      exit 1
    fi ;;
  *)
    exit 2 ;;
esac
"#;

/// A fake package system in a temp directory
pub struct FakeSystem {
    pub temp: TempDir,
    pub root: PathBuf,
    state: PathBuf,
    config_overrides: Vec<String>,
}

impl FakeSystem {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        let state = root.join("state");
        for dir in [
            "repo",
            "aur",
            "installed",
            "broken",
            "slow",
            "repo-search",
            "aur-search",
        ] {
            fs::create_dir_all(state.join(dir)).expect("Failed to create state directory");
        }
        fs::create_dir_all(root.join("bin")).expect("Failed to create bin directory");

        let system = Self {
            temp,
            root,
            state,
            config_overrides: Vec::new(),
        };
        system.write_script("pacman", FAKE_PACMAN);
        system.write_script("yay", FAKE_HELPER);
        system
    }

    fn write_script(&self, name: &str, template: &str) {
        let path = self.bin(name);
        let script = template.replace("@STATE@", &self.state.to_string_lossy());
        fs::write(&path, script).expect("Failed to write fake script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake script executable");
    }

    pub fn bin(&self, name: &str) -> PathBuf {
        self.root.join("bin").join(name)
    }

    fn mark(&self, dir: &str, names: &[&str]) -> &Self {
        for name in names {
            fs::write(self.state.join(dir).join(name), "").expect("Failed to write marker");
        }
        self
    }

    pub fn repo(&self, names: &[&str]) -> &Self {
        self.mark("repo", names)
    }

    pub fn aur(&self, names: &[&str]) -> &Self {
        self.mark("aur", names)
    }

    pub fn installed(&self, names: &[&str]) -> &Self {
        self.mark("installed", names)
    }

    pub fn broken(&self, names: &[&str]) -> &Self {
        self.mark("broken", names)
    }

    pub fn slow(&self, names: &[&str]) -> &Self {
        self.mark("slow", names)
    }

    /// `pacman -Ssq <term>` returns `hits`, one per line
    pub fn repo_search(&self, term: &str, hits: &[&str]) -> &Self {
        let output: String = hits.iter().map(|hit| format!("{hit}\n")).collect();
        fs::write(self.state.join("repo-search").join(term), output)
            .expect("Failed to write search results");
        self
    }

    /// Helper search returns one `aur/<hit>` record per hit
    pub fn aur_search(&self, term: &str, hits: &[&str]) -> &Self {
        let output: String = hits
            .iter()
            .map(|hit| format!("aur/{hit} 1.0-1 (+1 0.10)\n    {hit} package\n"))
            .collect();
        fs::write(self.state.join("aur-search").join(term), output)
            .expect("Failed to write search results");
        self
    }

    /// Extra `key: value` line for the generated config
    pub fn with_config(mut self, line: &str) -> Self {
        self.config_overrides.push(line.to_string());
        self
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.state.join("installed").join(name).exists()
    }

    /// "<source> <name>" for every install, in order
    pub fn install_log(&self) -> Vec<String> {
        fs::read_to_string(self.state.join("install.log"))
            .map(|log| log.lines().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("logs").join("pacfall.log")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    fn write_config(&self) {
        let mut lines = Vec::new();
        let overridden = |key: &str| {
            self.config_overrides
                .iter()
                .any(|line| line.starts_with(&format!("{key}:")))
        };
        let defaults = [
            ("privilege_wrapper", "env".to_string()),
            ("primary_command", path_str(&self.bin("pacman"))),
            ("community_helper", path_str(&self.bin("yay"))),
            ("bootstrap_helper", "false".to_string()),
            ("lookup_timeout_primary_secs", "2".to_string()),
            ("lookup_timeout_community_secs", "2".to_string()),
            ("install_timeout_secs", "30".to_string()),
            ("community_query_interval_ms", "0".to_string()),
            ("log_file", path_str(&self.log_path())),
        ];
        for (key, value) in defaults {
            if !overridden(key) {
                lines.push(format!("{key}: {value}"));
            }
        }
        lines.extend(self.config_overrides.iter().cloned());
        fs::write(self.config_path(), lines.join("\n") + "\n").expect("Failed to write config");
    }

    /// Write a package list file in the temp directory
    pub fn write_list(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, content).expect("Failed to write package list");
        path
    }

    /// pacfall command pointed at this system's config
    pub fn cmd(&self) -> Command {
        self.write_config();
        let mut cmd = pacfall_cmd();
        cmd.env_remove("PACFALL_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn pacfall_cmd() -> Command {
    Command::cargo_bin("pacfall").expect("pacfall binary should be built")
}
