//! Error types and handling for pacfall
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Only fatal conditions are errors. Everything that can go wrong while
//! resolving a single package (not found, timeout, install failure, operator
//! skip) is absorbed by the resolver and recorded in the outcome ledger.
//!
//! Sub-modules group constructors by domain:
//! - [`config`]: Configuration and package-list errors
//! - [`prereq`]: Missing prerequisites (privilege wrapper, helper bootstrap)
//! - [`git`]: Helper repository clone errors
//! - [`fs`]: File system errors

pub mod config;
pub mod fs;
pub mod git;
pub mod prereq;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pacfall operations
#[derive(Error, Diagnostic, Debug)]
pub enum PacfallError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(pacfall::config::not_found),
        help("Pass an existing file with --config or unset PACFALL_CONFIG")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(pacfall::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(pacfall::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(pacfall::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to read package list: {path}: {reason}")]
    #[diagnostic(
        code(pacfall::config::package_list),
        help("Package lists contain one name per line; '#' starts a comment")
    )]
    PackageListReadFailed { path: String, reason: String },

    #[error("Invalid package name: {name}")]
    #[diagnostic(
        code(pacfall::config::invalid_name),
        help("Package names use lowercase letters, digits and @._+- and cannot start with '-' or '.'")
    )]
    InvalidPackageName { name: String },

    #[error("No packages requested")]
    #[diagnostic(
        code(pacfall::config::no_packages),
        help("Pass package names as arguments or use --file")
    )]
    NoPackagesRequested,

    // Prerequisite errors
    #[error("Privilege escalation wrapper '{wrapper}' not found")]
    #[diagnostic(
        code(pacfall::prereq::privilege_wrapper),
        help("Install sudo (or set privilege_wrapper in the config) before running pacfall")
    )]
    PrivilegeWrapperMissing { wrapper: String },

    #[error("Failed to bootstrap AUR helper '{helper}': {reason}")]
    #[diagnostic(code(pacfall::prereq::helper_bootstrap))]
    HelperBootstrapFailed { helper: String, reason: String },

    // Git errors
    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(pacfall::git::clone_failed),
        help("Check network access to the AUR")
    )]
    GitCloneFailed { url: String, reason: String },

    // File system errors
    #[error("Failed to write file: {path}")]
    #[diagnostic(code(pacfall::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(pacfall::fs::io_error))]
    IoError { message: String },

    // Prompt errors
    #[error("Interrupted by operator")]
    #[diagnostic(code(pacfall::prompt::interrupted))]
    Interrupted,

    // Run result
    #[error("{deferred} package(s) deferred, {failed} package(s) failed")]
    #[diagnostic(
        code(pacfall::run::unresolved),
        help("See the summary above and the run log for the names that need manual follow-up")
    )]
    UnresolvedPackages { deferred: usize, failed: usize },
}

impl PacfallError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PacfallError::UnresolvedPackages { .. } => 2,
            PacfallError::Interrupted => 130,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for PacfallError {
    fn from(err: std::io::Error) -> Self {
        PacfallError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for PacfallError {
    fn from(err: serde_yaml::Error) -> Self {
        PacfallError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PacfallError {
    fn from(err: serde_json::Error) -> Self {
        PacfallError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<git2::Error> for PacfallError {
    fn from(err: git2::Error) -> Self {
        PacfallError::GitCloneFailed {
            url: "unknown".to_string(),
            reason: err.message().to_string(),
        }
    }
}

impl From<inquire::InquireError> for PacfallError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationInterrupted => PacfallError::Interrupted,
            other => PacfallError::IoError {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PacfallError>;
