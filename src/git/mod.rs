//! Git cloning for AUR package repositories
//!
//! AUR packages are plain git repositories holding a PKGBUILD. The helper
//! bootstrap only ever needs a shallow HTTPS clone of one of them.

use std::path::Path;

use git2::{ErrorClass, FetchOptions, Repository, build::RepoBuilder};
use tracing::debug;

use crate::error::{Result, git};

/// Shallow-clone `url` into `target`
pub fn shallow_clone(url: &str, target: &Path) -> Result<Repository> {
    debug!("Cloning {} into {}", url, target.display());

    let mut fetch_options = FetchOptions::new();
    fetch_options.depth(1);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);
    builder
        .clone(url, target)
        .map_err(|e| git::clone_failed(url, interpret_git_error(&e)))
}

/// Turn a git2 error into a short operator-facing reason
pub fn interpret_git_error(err: &git2::Error) -> String {
    let message = err.message().to_lowercase();

    if message.contains("not found") || message.contains("404") {
        return "Repository not found".to_string();
    }
    if message.contains("connection")
        || message.contains("network")
        || message.contains("timed out")
        || message.contains("resolve")
    {
        return "Network error".to_string();
    }
    match err.class() {
        ErrorClass::Http if message.contains("certificate") => "Certificate error".to_string(),
        ErrorClass::Http if message.contains("ssl") => "SSL error".to_string(),
        ErrorClass::Http => format!("HTTP error: {}", err.message()),
        _ => err.message().to_string(),
    }
}
