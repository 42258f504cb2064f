//! Startup prerequisite checks

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, prereq};

/// Resolve the privilege escalation wrapper on `PATH`.
///
/// Runs before any package is touched; without it nothing can be installed.
pub fn check_privilege_wrapper(wrapper: &str) -> Result<PathBuf> {
    match which::which(wrapper) {
        Ok(path) => {
            debug!("Privilege wrapper {} at {}", wrapper, path.display());
            Ok(path)
        }
        Err(_) => Err(prereq::privilege_wrapper_missing(wrapper)),
    }
}
