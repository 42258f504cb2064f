//! One-time installation of the AUR helper
//!
//! A fresh Arch install has `base-devel` and `git` but no helper. The helper
//! is itself an AUR package, so it is built from its own AUR repository with
//! `makepkg`. Any failure here disables the community source; it never aborts
//! the run.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use super::command::{self, CommandSpec};
use crate::error::{Result, prereq};
use crate::git;

/// Base URL for AUR package git repositories
pub const AUR_GIT_BASE: &str = "https://aur.archlinux.org";

/// Clone and build `<helper>-bin`, then confirm the helper is on `PATH`
pub fn bootstrap_helper(helper: &str, build_timeout: Duration) -> Result<()> {
    info!("Bootstrapping AUR helper '{}'", helper);

    let workdir = tempfile::Builder::new()
        .prefix("pacfall-bootstrap-")
        .tempdir_in(scratch_base())
        .map_err(|e| prereq::helper_bootstrap_failed(helper, e.to_string()))?;
    let checkout = workdir.path().join(helper);
    let url = format!("{AUR_GIT_BASE}/{helper}-bin.git");

    git::shallow_clone(&url, &checkout)
        .map_err(|e| prereq::helper_bootstrap_failed(helper, e.to_string()))?;

    let outcome = command::run(
        &CommandSpec::new("makepkg", ["-si", "--noconfirm"], build_timeout)
            .in_dir(&checkout)
            .interactive(),
    );
    if !outcome.success {
        let reason = if outcome.timed_out {
            "makepkg timed out".to_string()
        } else {
            format!(
                "makepkg exited with {}",
                outcome
                    .exit_code
                    .map_or_else(|| "no status".to_string(), |code| code.to_string())
            )
        };
        return Err(prereq::helper_bootstrap_failed(helper, reason));
    }

    which::which(helper)
        .map_err(|_| prereq::helper_bootstrap_failed(helper, "not on PATH after build"))?;
    info!("AUR helper '{}' installed", helper);
    Ok(())
}

/// Absolute directory for scratch checkouts.
/// A relative `TMPDIR` would otherwise put the checkout under the current directory.
fn scratch_base() -> PathBuf {
    let dir = env::temp_dir();
    if dir.is_absolute() {
        dir
    } else {
        PathBuf::from("/tmp")
    }
}
