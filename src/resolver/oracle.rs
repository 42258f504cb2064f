//! Installed-state oracle
//!
//! A package counts as installed when either source's local records list it.
//! A failing or timed-out query answers `false`; the worst case is a
//! redundant `--needed` install, which pacman and the helpers treat as a no-op.

use crate::source::{SourceKind, SourceRegistry};

/// Whether `name` is already on the system
pub fn is_installed(registry: &mut SourceRegistry, name: &str) -> bool {
    registry.is_installed(name, SourceKind::Primary)
        || registry.is_installed(name, SourceKind::Community)
}
